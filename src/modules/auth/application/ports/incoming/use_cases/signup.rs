use async_trait::async_trait;
use serde::Serialize;

use crate::shared::api::FieldErrors;

//
// ──────────────────────────────────────────────────────────
// Command / Result
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default)]
pub struct SignupCommand {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResult {
    pub username: String,
    pub email: String,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, thiserror::Error)]
pub enum SignupError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Failed to deliver confirmation code: {0}")]
    EmailDelivery(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

/// Registers a new account or re-sends a code to an existing one.
#[async_trait]
pub trait SignupUseCase: Send + Sync {
    async fn execute(&self, command: SignupCommand) -> Result<SignupResult, SignupError>;
}
