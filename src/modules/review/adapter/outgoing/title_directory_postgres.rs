use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::catalog::adapter::outgoing::sea_orm_entity::titles;
use crate::review::application::ports::outgoing::{StoreError, TitleDirectory};

#[derive(Clone, Debug)]
pub struct TitleDirectoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl TitleDirectoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TitleDirectory for TitleDirectoryPostgres {
    async fn exists(&self, title_id: Uuid) -> Result<bool, StoreError> {
        titles::Entity::find_by_id(title_id)
            .one(&*self.db)
            .await
            .map(|row| row.is_some())
            .map_err(|e| StoreError::DatabaseError(e.to_string()))
    }
}
