use async_trait::async_trait;
use email_address::EmailAddress;
use tracing::info;

use crate::email::application::ports::outgoing::email_sender::{EmailError, EmailSender};

/// Development backend: writes the message to the log instead of a mail server.
#[derive(Debug, Clone, Default)]
pub struct ConsoleEmailSender;

#[async_trait]
impl EmailSender for ConsoleEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if !EmailAddress::is_valid(to) {
            return Err(EmailError::InvalidAddress(to.to_string()));
        }

        info!(recipient = %to, subject = %subject, body = %body, "Outgoing email");
        Ok(())
    }
}
