use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::review::application::domain::entities::{Comment, CommentDraft};
use crate::review::application::ports::outgoing::{CommentRepository, StoreError};

use super::author_names::author_names;
use super::sea_orm_entity::comments;

#[derive(Clone, Debug)]
pub struct CommentRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl CommentRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn with_authors(&self, rows: Vec<comments::Model>) -> Result<Vec<Comment>, StoreError> {
        let names = author_names(&*self.db, rows.iter().map(|c| c.author_id).collect())
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let author = names.get(&row.author_id).cloned().unwrap_or_default();
                Comment {
                    id: row.id,
                    review_id: row.review_id,
                    author_id: UserId::from(row.author_id),
                    author,
                    text: row.text,
                    pub_date: row.pub_date.into(),
                }
            })
            .collect())
    }

    async fn with_author(&self, row: comments::Model) -> Result<Comment, StoreError> {
        self.with_authors(vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }
}

fn map_db_err(e: DbErr) -> StoreError {
    StoreError::DatabaseError(e.to_string())
}

#[async_trait]
impl CommentRepository for CommentRepositoryPostgres {
    async fn list_for_review(&self, review_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let rows = comments::Entity::find()
            .filter(comments::Column::ReviewId.eq(review_id))
            .order_by_desc(comments::Column::PubDate)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        self.with_authors(rows).await
    }

    async fn find_in_review(
        &self,
        review_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Comment>, StoreError> {
        let row = comments::Entity::find_by_id(id)
            .filter(comments::Column::ReviewId.eq(review_id))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => self.with_author(row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        review_id: Uuid,
        author_id: UserId,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError> {
        let row = comments::Model {
            id: Uuid::new_v4(),
            review_id,
            author_id: author_id.value(),
            text: draft.text,
            pub_date: Utc::now().into(),
        };
        let active: comments::ActiveModel = row.clone().into();

        comments::Entity::insert(active.reset_all())
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| {
                tracing::error!(review_id = %review_id, error = %e, "Failed to insert comment");
                map_db_err(e)
            })?;

        self.with_author(row).await
    }

    async fn update_text(&self, id: Uuid, text: String) -> Result<Comment, StoreError> {
        let current = comments::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(StoreError::NotFound)?;

        let mut active: comments::ActiveModel = current.into();
        active.text = Set(text);

        let updated = active.update(&*self.db).await.map_err(map_db_err)?;
        self.with_author(updated).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = comments::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
