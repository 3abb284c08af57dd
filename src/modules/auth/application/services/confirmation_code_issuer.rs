use std::fmt;
use std::sync::Arc;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::{ConfirmationCodeGenerator, UserRepository};
use crate::email::application::ports::outgoing::EmailSender;

pub const CONFIRMATION_SUBJECT: &str = "Your confirmation code";

#[derive(Debug, Clone, thiserror::Error)]
pub enum IssueCodeError {
    #[error("Failed to store confirmation code: {0}")]
    Repository(String),

    #[error("Failed to send confirmation code: {0}")]
    Delivery(String),
}

/// Generates a code, stores it on the user (replacing any older one) and mails it.
#[derive(Clone)]
pub struct ConfirmationCodeIssuer {
    user_repository: Arc<dyn UserRepository>,
    generator: Arc<dyn ConfirmationCodeGenerator>,
    sender: Arc<dyn EmailSender>,
}

impl fmt::Debug for ConfirmationCodeIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationCodeIssuer")
            .field("sender", &"<dyn EmailSender>")
            .finish()
    }
}

impl ConfirmationCodeIssuer {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        generator: Arc<dyn ConfirmationCodeGenerator>,
        sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            user_repository,
            generator,
            sender,
        }
    }

    pub async fn issue(&self, user: &User) -> Result<String, IssueCodeError> {
        let code = self.generator.generate();

        self.user_repository
            .set_confirmation_code(user.id, Some(code.clone()))
            .await
            .map_err(|e| IssueCodeError::Repository(e.to_string()))?;

        let body = format!("Your confirmation code: {code}");
        self.sender
            .send_email(&user.email, CONFIRMATION_SUBJECT, &body)
            .await
            .map_err(|e| IssueCodeError::Delivery(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Confirmation code issued");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate::*};

    use crate::email::application::ports::outgoing::EmailError;
    use crate::tests::support::in_memory::{sample_user, FixedCodeGenerator, InMemoryUserStore};

    mock! {
        pub Sender {}
        #[async_trait]
        impl EmailSender for Sender {
            async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
        }
    }

    #[tokio::test]
    async fn stores_code_and_mails_it_to_the_user() {
        let store = InMemoryUserStore::default();
        let user = store.insert(sample_user("alice", "alice@example.com"));

        let mut sender = MockSender::new();
        sender
            .expect_send_email()
            .with(
                eq("alice@example.com"),
                eq(CONFIRMATION_SUBJECT),
                function(|body: &str| body.contains("AB12CD")),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let issuer = ConfirmationCodeIssuer::new(
            Arc::new(store.clone()),
            Arc::new(FixedCodeGenerator::new(&["AB12CD"])),
            Arc::new(sender),
        );

        let code = issuer.issue(&user).await.unwrap();

        assert_eq!(code, "AB12CD");
        assert_eq!(
            store.get("alice").unwrap().confirmation_code.as_deref(),
            Some("AB12CD")
        );
    }

    #[tokio::test]
    async fn latest_code_replaces_previous_one() {
        let store = InMemoryUserStore::default();
        let user = store.insert(sample_user("bob", "bob@example.com"));

        let mut sender = MockSender::new();
        sender.expect_send_email().times(2).returning(|_, _, _| Ok(()));

        let issuer = ConfirmationCodeIssuer::new(
            Arc::new(store.clone()),
            Arc::new(FixedCodeGenerator::new(&["FIRST1", "SECND2"])),
            Arc::new(sender),
        );

        issuer.issue(&user).await.unwrap();
        issuer.issue(&user).await.unwrap();

        assert_eq!(
            store.get("bob").unwrap().confirmation_code.as_deref(),
            Some("SECND2")
        );
    }

    #[tokio::test]
    async fn delivery_failure_is_propagated() {
        let store = InMemoryUserStore::default();
        let user = store.insert(sample_user("carol", "carol@example.com"));

        let mut sender = MockSender::new();
        sender
            .expect_send_email()
            .returning(|_, _, _| Err(EmailError::DeliveryFailed("smtp down".to_string())));

        let issuer = ConfirmationCodeIssuer::new(
            Arc::new(store),
            Arc::new(FixedCodeGenerator::new(&["AAAAAA"])),
            Arc::new(sender),
        );

        let result = issuer.issue(&user).await;

        assert!(matches!(result, Err(IssueCodeError::Delivery(msg)) if msg.contains("smtp down")));
    }
}
