use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::ports::incoming::use_cases::{
    ObtainTokenCommand, ObtainTokenError, ObtainTokenUseCase,
};
use crate::auth::application::ports::outgoing::{TokenProvider, UserQuery, UserRepository};
use crate::shared::api::FieldErrors;

use super::field_checks::REQUIRED;

pub struct ObtainTokenService {
    user_query: Arc<dyn UserQuery>,
    user_repository: Arc<dyn UserRepository>,
    token_provider: Arc<dyn TokenProvider>,
    single_use_codes: bool,
}

impl ObtainTokenService {
    pub fn new(
        user_query: Arc<dyn UserQuery>,
        user_repository: Arc<dyn UserRepository>,
        token_provider: Arc<dyn TokenProvider>,
        single_use_codes: bool,
    ) -> Self {
        Self {
            user_query,
            user_repository,
            token_provider,
            single_use_codes,
        }
    }
}

fn required(value: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

#[async_trait]
impl ObtainTokenUseCase for ObtainTokenService {
    async fn execute(&self, command: ObtainTokenCommand) -> Result<String, ObtainTokenError> {
        let mut errors = FieldErrors::new();
        let username = required(command.username.as_deref(), "username", &mut errors);
        let code = required(
            command.confirmation_code.as_deref(),
            "confirmation_code",
            &mut errors,
        );
        let (Some(username), Some(code)) = (username, code) else {
            return Err(ObtainTokenError::Validation(errors));
        };

        let user = self
            .user_query
            .find_by_username(&username)
            .await
            .map_err(|e| ObtainTokenError::RepositoryError(e.to_string()))?
            .ok_or(ObtainTokenError::UserNotFound)?;

        if user.confirmation_code.as_deref() != Some(code.as_str()) {
            tracing::warn!(username = %username, "Confirmation code mismatch");
            return Err(ObtainTokenError::InvalidCode);
        }

        if self.single_use_codes {
            let consumed = self
                .user_repository
                .consume_confirmation_code(user.id, &code)
                .await
                .map_err(|e| ObtainTokenError::RepositoryError(e.to_string()))?;
            if !consumed {
                tracing::warn!(username = %username, "Confirmation code already used");
                return Err(ObtainTokenError::InvalidCode);
            }
        }

        let token = self
            .token_provider
            .generate_access_token(user.id, &user.username)
            .map_err(|e| ObtainTokenError::TokenError(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Access token issued");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::in_memory::{sample_user, InMemoryUserStore};
    use crate::tests::support::stubs::StubTokenProvider;

    fn store_with_code(code: &str) -> InMemoryUserStore {
        let store = InMemoryUserStore::default();
        let mut user = sample_user("alice", "alice@example.com");
        user.confirmation_code = Some(code.to_string());
        store.insert(user);
        store
    }

    fn service(store: &InMemoryUserStore, single_use: bool) -> ObtainTokenService {
        ObtainTokenService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(StubTokenProvider),
            single_use,
        )
    }

    fn command(username: &str, code: &str) -> ObtainTokenCommand {
        ObtainTokenCommand {
            username: Some(username.to_string()),
            confirmation_code: Some(code.to_string()),
        }
    }

    #[tokio::test]
    async fn latest_code_yields_token_for_the_user() {
        let store = store_with_code("ABC123");
        let user_id = store.get("alice").unwrap().id;

        let token = service(&store, true)
            .execute(command("alice", "ABC123"))
            .await
            .unwrap();

        let claims = StubTokenProvider.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.value());
    }

    #[tokio::test]
    async fn wrong_code_is_rejected() {
        let store = store_with_code("ABC123");

        let err = service(&store, true)
            .execute(command("alice", "ZZZ999"))
            .await
            .unwrap_err();

        assert!(matches!(err, ObtainTokenError::InvalidCode));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = store_with_code("ABC123");

        let err = service(&store, true)
            .execute(command("nobody", "ABC123"))
            .await
            .unwrap_err();

        assert!(matches!(err, ObtainTokenError::UserNotFound));
    }

    #[tokio::test]
    async fn user_without_code_cannot_exchange() {
        let store = InMemoryUserStore::default();
        store.insert(sample_user("bob", "bob@example.com"));

        let err = service(&store, true)
            .execute(command("bob", "ABC123"))
            .await
            .unwrap_err();

        assert!(matches!(err, ObtainTokenError::InvalidCode));
    }

    #[tokio::test]
    async fn blank_fields_are_validation_errors() {
        let store = InMemoryUserStore::default();

        let err = service(&store, true)
            .execute(ObtainTokenCommand {
                username: Some("  ".to_string()),
                confirmation_code: None,
            })
            .await
            .unwrap_err();

        match err {
            ObtainTokenError::Validation(fields) => {
                assert!(fields.contains("username"));
                assert!(fields.contains("confirmation_code"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_use_code_cannot_be_replayed() {
        let store = store_with_code("ABC123");
        let service = service(&store, true);

        service.execute(command("alice", "ABC123")).await.unwrap();
        let err = service
            .execute(command("alice", "ABC123"))
            .await
            .unwrap_err();

        assert!(matches!(err, ObtainTokenError::InvalidCode));
        assert!(store.get("alice").unwrap().confirmation_code.is_none());
    }

    #[tokio::test]
    async fn reusable_code_can_be_replayed_when_configured() {
        let store = store_with_code("ABC123");
        let service = service(&store, false);

        service.execute(command("alice", "ABC123")).await.unwrap();
        assert!(service.execute(command("alice", "ABC123")).await.is_ok());
    }
}
