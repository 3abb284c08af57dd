use async_trait::async_trait;

use crate::shared::api::FieldErrors;

#[derive(Debug, Clone, Default)]
pub struct ObtainTokenCommand {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ObtainTokenError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid confirmation code")]
    InvalidCode,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait ObtainTokenUseCase: Send + Sync {
    /// Exchanges a confirmation code for a signed access token.
    async fn execute(&self, command: ObtainTokenCommand) -> Result<String, ObtainTokenError>;
}
