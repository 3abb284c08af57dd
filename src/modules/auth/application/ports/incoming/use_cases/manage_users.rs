use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::application::domain::entities::{User, UserRole};
use crate::shared::api::FieldErrors;

//
// ──────────────────────────────────────────────────────────
// Shared view
// ──────────────────────────────────────────────────────────
//

/// Public representation of an account. The confirmation code never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    #[schema(value_type = String, example = "user")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default)]
pub struct CreateUserCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

/// Field-wise patch. Absent fields stay as they are.
#[derive(Debug, Clone, Default)]
pub struct PatchUserCommand {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, thiserror::Error)]
pub enum ManageUsersError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("User not found")]
    NotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

/// Account administration. Callers are expected to have passed the admin policy.
#[async_trait]
pub trait ManageUsersUseCase: Send + Sync {
    async fn list(&self, search: Option<String>) -> Result<Vec<UserProfile>, ManageUsersError>;

    async fn get(&self, username: &str) -> Result<UserProfile, ManageUsersError>;

    async fn create(&self, command: CreateUserCommand) -> Result<UserProfile, ManageUsersError>;

    async fn patch(
        &self,
        username: &str,
        command: PatchUserCommand,
    ) -> Result<UserProfile, ManageUsersError>;

    async fn delete(&self, username: &str) -> Result<(), ManageUsersError>;
}
