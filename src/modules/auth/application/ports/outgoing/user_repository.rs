use async_trait::async_trait;

use crate::auth::application::domain::entities::{User, UserId, UserRole};

// Input DTO for creating a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserData {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
}

impl CreateUserData {
    /// A self-registered account: plain role, empty profile.
    pub fn signup(username: String, email: String) -> Self {
        Self {
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: UserRole::User,
        }
    }
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserData {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUserData {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Which unique column rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Unknown,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("User already exists ({0:?})")]
    UserAlreadyExists(UniqueField),

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, data: CreateUserData) -> Result<User, UserRepositoryError>;

    async fn update_user(
        &self,
        user_id: UserId,
        data: UpdateUserData,
    ) -> Result<User, UserRepositoryError>;

    /// Replaces whatever code was stored; `None` clears it.
    async fn set_confirmation_code(
        &self,
        user_id: UserId,
        code: Option<String>,
    ) -> Result<(), UserRepositoryError>;

    /// Clears the stored code only if it still equals `code`.
    /// Returns whether a row was changed, so two concurrent exchanges cannot both win.
    async fn consume_confirmation_code(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<bool, UserRepositoryError>;

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepositoryError>;
}
