use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::incoming::use_cases::{
    CreateUserCommand, ManageUsersError, ManageUsersUseCase, PatchUserCommand, UserProfile,
};
use crate::auth::application::ports::outgoing::{
    CreateUserData, UserQuery, UserRepository, UserRepositoryError,
};
use crate::shared::api::FieldErrors;

use super::field_checks::{
    build_profile_update, check_email, check_name, check_role, check_username, duplicate,
    ProfilePatch,
};

pub struct ManageUsersService {
    user_query: Arc<dyn UserQuery>,
    user_repository: Arc<dyn UserRepository>,
}

impl ManageUsersService {
    pub fn new(user_query: Arc<dyn UserQuery>, user_repository: Arc<dyn UserRepository>) -> Self {
        Self {
            user_query,
            user_repository,
        }
    }

    async fn require(&self, username: &str) -> Result<User, ManageUsersError> {
        self.user_query
            .find_by_username(username)
            .await
            .map_err(|e| ManageUsersError::RepositoryError(e.to_string()))?
            .ok_or(ManageUsersError::NotFound)
    }
}

fn map_repo_error(e: UserRepositoryError) -> ManageUsersError {
    match e {
        UserRepositoryError::UserAlreadyExists(field) => {
            ManageUsersError::Validation(duplicate(field))
        }
        UserRepositoryError::UserNotFound => ManageUsersError::NotFound,
        UserRepositoryError::DatabaseError(msg) => ManageUsersError::RepositoryError(msg),
    }
}

#[async_trait]
impl ManageUsersUseCase for ManageUsersService {
    async fn list(&self, search: Option<String>) -> Result<Vec<UserProfile>, ManageUsersError> {
        let search = search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let users = self
            .user_query
            .list(search)
            .await
            .map_err(|e| ManageUsersError::RepositoryError(e.to_string()))?;

        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    async fn get(&self, username: &str) -> Result<UserProfile, ManageUsersError> {
        self.require(username).await.map(UserProfile::from)
    }

    async fn create(&self, command: CreateUserCommand) -> Result<UserProfile, ManageUsersError> {
        let mut errors = FieldErrors::new();
        let username = check_username(command.username.as_deref(), &mut errors);
        let email = check_email(command.email.as_deref(), &mut errors);
        let first_name = check_name(
            "first_name",
            command.first_name.as_deref().unwrap_or(""),
            &mut errors,
        );
        let last_name = check_name(
            "last_name",
            command.last_name.as_deref().unwrap_or(""),
            &mut errors,
        );
        let role = match command.role.as_deref() {
            Some(raw) => check_role(raw, &mut errors),
            None => Some(Default::default()),
        };

        let (Some(username), Some(email), Some(first_name), Some(last_name), Some(role)) =
            (username, email, first_name, last_name, role)
        else {
            return Err(ManageUsersError::Validation(errors));
        };

        let user = self
            .user_repository
            .create_user(CreateUserData {
                username,
                email,
                first_name,
                last_name,
                bio: command.bio.unwrap_or_default(),
                role,
            })
            .await
            .map_err(map_repo_error)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created by admin");
        Ok(user.into())
    }

    async fn patch(
        &self,
        username: &str,
        command: PatchUserCommand,
    ) -> Result<UserProfile, ManageUsersError> {
        let target = self.require(username).await?;

        let mut errors = FieldErrors::new();
        let mut update = build_profile_update(
            ProfilePatch {
                username: command.username.as_deref(),
                email: command.email.as_deref(),
                first_name: command.first_name.as_deref(),
                last_name: command.last_name.as_deref(),
                bio: command.bio.as_deref(),
            },
            &mut errors,
        );
        update.role = command
            .role
            .as_deref()
            .and_then(|raw| check_role(raw, &mut errors));
        errors.into_result().map_err(ManageUsersError::Validation)?;

        if update.is_empty() {
            return Ok(target.into());
        }

        let updated = self
            .user_repository
            .update_user(target.id, update)
            .await
            .map_err(map_repo_error)?;

        Ok(updated.into())
    }

    async fn delete(&self, username: &str) -> Result<(), ManageUsersError> {
        let target = self.require(username).await?;

        self.user_repository
            .delete_user(target.id)
            .await
            .map_err(map_repo_error)?;

        tracing::info!(user_id = %target.id, "User deleted");
        Ok(())
    }
}
