use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{User, UserId};
use crate::auth::application::ports::outgoing::user_repository::{
    CreateUserData, UpdateUserData, UserRepository, UserRepositoryError,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity,
};
use super::user_mapping::{to_domain, unique_violation};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn map_write_err(e: DbErr) -> UserRepositoryError {
    match unique_violation(&e) {
        Some(field) => UserRepositoryError::UserAlreadyExists(field),
        None => UserRepositoryError::DatabaseError(e.to_string()),
    }
}

fn map_db_err(e: DbErr) -> UserRepositoryError {
    UserRepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create_user(&self, data: CreateUserData) -> Result<User, UserRepositoryError> {
        let now = Utc::now().fixed_offset();
        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(data.username),
            email: Set(data.email),
            first_name: Set(data.first_name),
            last_name: Set(data.last_name),
            bio: Set(data.bio),
            role: Set(data.role.as_str().to_string()),
            is_superuser: Set(false),
            confirmation_code: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = active_user.insert(&*self.db).await.map_err(map_write_err)?;

        Ok(to_domain(inserted))
    }

    async fn update_user(
        &self,
        user_id: UserId,
        data: UpdateUserData,
    ) -> Result<User, UserRepositoryError> {
        let user = UserEntity::find_by_id(user_id.value())
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(UserRepositoryError::UserNotFound)?;

        let mut active_user: UserActiveModel = user.into();
        if let Some(username) = data.username {
            active_user.username = Set(username);
        }
        if let Some(email) = data.email {
            active_user.email = Set(email);
        }
        if let Some(first_name) = data.first_name {
            active_user.first_name = Set(first_name);
        }
        if let Some(last_name) = data.last_name {
            active_user.last_name = Set(last_name);
        }
        if let Some(bio) = data.bio {
            active_user.bio = Set(bio);
        }
        if let Some(role) = data.role {
            active_user.role = Set(role.as_str().to_string());
        }

        let updated = active_user
            .update(&*self.db)
            .await
            .map_err(map_write_err)?;

        Ok(to_domain(updated))
    }

    async fn set_confirmation_code(
        &self,
        user_id: UserId,
        code: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        let result = UserEntity::update_many()
            .col_expr(UserColumn::ConfirmationCode, Expr::value(code))
            .col_expr(UserColumn::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(UserColumn::Id.eq(user_id.value()))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }
        Ok(())
    }

    async fn consume_confirmation_code(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<bool, UserRepositoryError> {
        let result = UserEntity::update_many()
            .col_expr(
                UserColumn::ConfirmationCode,
                Expr::value(Option::<String>::None),
            )
            .filter(UserColumn::Id.eq(user_id.value()))
            .filter(UserColumn::ConfirmationCode.eq(code))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected == 1)
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepositoryError> {
        let result = UserEntity::delete_by_id(user_id.value())
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }
        Ok(())
    }
}
