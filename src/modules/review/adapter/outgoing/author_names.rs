use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::adapter::outgoing::sea_orm_entity::users;

/// Usernames for a batch of author ids, in one query.
pub(super) async fn author_names<C: ConnectionTrait>(
    db: &C,
    mut author_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    author_ids.sort();
    author_ids.dedup();
    if author_ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(users::Entity::find()
        .filter(users::Column::Id.is_in(author_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect())
}
