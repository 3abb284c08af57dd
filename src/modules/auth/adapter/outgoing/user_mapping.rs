use sea_orm::DbErr;

use crate::auth::application::domain::entities::{User, UserId, UserRole};
use crate::auth::application::ports::outgoing::UniqueField;
use crate::shared::db::is_unique_violation;

use super::sea_orm_entity::users::Model as UserModel;

/// Rows with a role outside the closed set are treated as plain users.
pub(super) fn to_domain(model: UserModel) -> User {
    let role = model.role.parse::<UserRole>().unwrap_or_else(|e| {
        tracing::warn!(user_id = %model.id, error = %e, "Unknown role in users table");
        UserRole::User
    });

    User {
        id: UserId::from(model.id),
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        role,
        is_superuser: model.is_superuser,
        confirmation_code: model.confirmation_code,
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    }
}

/// Detects a Postgres unique violation and names the column when the message allows it.
pub(super) fn unique_violation(e: &DbErr) -> Option<UniqueField> {
    if !is_unique_violation(e) {
        return None;
    }

    let msg = e.to_string().to_lowercase();
    Some(if msg.contains("email") {
        UniqueField::Email
    } else if msg.contains("username") {
        UniqueField::Username
    } else {
        UniqueField::Unknown
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_the_column() {
        let email = DbErr::Custom(
            "duplicate key value violates unique constraint \"uq_users_email\"".to_string(),
        );
        let username = DbErr::Custom(
            "duplicate key value violates unique constraint \"uq_users_username\"".to_string(),
        );
        let other = DbErr::Custom("connection reset".to_string());

        assert_eq!(unique_violation(&email), Some(UniqueField::Email));
        assert_eq!(unique_violation(&username), Some(UniqueField::Username));
        assert_eq!(unique_violation(&other), None);
    }
}
