use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::domain::entities::UserId;
use crate::auth::application::ports::incoming::use_cases::{
    OwnProfileError, OwnProfileUseCase, UpdateOwnProfileCommand, UserProfile,
};
use crate::auth::application::ports::outgoing::{UserQuery, UserRepository, UserRepositoryError};
use crate::shared::api::FieldErrors;

use super::field_checks::{build_profile_update, duplicate, ProfilePatch};

pub struct OwnProfileService {
    user_query: Arc<dyn UserQuery>,
    user_repository: Arc<dyn UserRepository>,
}

impl OwnProfileService {
    pub fn new(user_query: Arc<dyn UserQuery>, user_repository: Arc<dyn UserRepository>) -> Self {
        Self {
            user_query,
            user_repository,
        }
    }
}

#[async_trait]
impl OwnProfileUseCase for OwnProfileService {
    async fn get(&self, user_id: UserId) -> Result<UserProfile, OwnProfileError> {
        self.user_query
            .find_by_id(user_id)
            .await
            .map_err(|e| OwnProfileError::RepositoryError(e.to_string()))?
            .map(UserProfile::from)
            .ok_or(OwnProfileError::NotFound)
    }

    async fn update(
        &self,
        user_id: UserId,
        command: UpdateOwnProfileCommand,
    ) -> Result<UserProfile, OwnProfileError> {
        let mut errors = FieldErrors::new();
        let update = build_profile_update(
            ProfilePatch {
                username: command.username.as_deref(),
                email: command.email.as_deref(),
                first_name: command.first_name.as_deref(),
                last_name: command.last_name.as_deref(),
                bio: command.bio.as_deref(),
            },
            &mut errors,
        );
        errors.into_result().map_err(OwnProfileError::Validation)?;

        if update.is_empty() {
            return self.get(user_id).await;
        }

        self.user_repository
            .update_user(user_id, update)
            .await
            .map(UserProfile::from)
            .map_err(|e| match e {
                UserRepositoryError::UserAlreadyExists(field) => {
                    OwnProfileError::Validation(duplicate(field))
                }
                UserRepositoryError::UserNotFound => OwnProfileError::NotFound,
                UserRepositoryError::DatabaseError(msg) => OwnProfileError::RepositoryError(msg),
            })
    }
}
