use async_trait::async_trait;

use crate::auth::application::domain::entities::UserId;
use crate::shared::api::FieldErrors;

use super::manage_users::UserProfile;

#[derive(Debug, Clone, Default)]
pub struct UpdateOwnProfileCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OwnProfileError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("User not found")]
    NotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Read and edit the caller's own account. Role is not part of the command.
#[async_trait]
pub trait OwnProfileUseCase: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<UserProfile, OwnProfileError>;

    async fn update(
        &self,
        user_id: UserId,
        command: UpdateOwnProfileCommand,
    ) -> Result<UserProfile, OwnProfileError>;
}
