use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::review::application::domain::entities::{Review, ReviewChanges, ReviewDraft};
use crate::review::application::ports::outgoing::{ReviewRepository, StoreError};
use crate::shared::db::is_unique_violation;

use super::author_names::author_names;
use super::sea_orm_entity::{comments, reviews};

#[derive(Clone, Debug)]
pub struct ReviewRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn with_authors(&self, rows: Vec<reviews::Model>) -> Result<Vec<Review>, StoreError> {
        let names = author_names(&*self.db, rows.iter().map(|r| r.author_id).collect())
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let author = names.get(&row.author_id).cloned().unwrap_or_default();
                to_domain(row, author)
            })
            .collect())
    }

    async fn with_author(&self, row: reviews::Model) -> Result<Review, StoreError> {
        self.with_authors(vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn delete_with_comments(txn: &DatabaseTransaction, id: Uuid) -> Result<u64, DbErr> {
        comments::Entity::delete_many()
            .filter(comments::Column::ReviewId.eq(id))
            .exec(txn)
            .await?;

        let result = reviews::Entity::delete_by_id(id).exec(txn).await?;
        Ok(result.rows_affected)
    }
}

fn to_domain(row: reviews::Model, author: String) -> Review {
    Review {
        id: row.id,
        title_id: row.title_id,
        author_id: UserId::from(row.author_id),
        author,
        text: row.text,
        score: row.score,
        pub_date: row.pub_date.into(),
    }
}

fn map_db_err(e: DbErr) -> StoreError {
    StoreError::DatabaseError(e.to_string())
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryPostgres {
    async fn list_for_title(&self, title_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let rows = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .order_by_desc(reviews::Column::PubDate)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        self.with_authors(rows).await
    }

    async fn find_in_title(&self, title_id: Uuid, id: Uuid) -> Result<Option<Review>, StoreError> {
        let row = reviews::Entity::find_by_id(id)
            .filter(reviews::Column::TitleId.eq(title_id))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => self.with_author(row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn author_has_review(
        &self,
        title_id: Uuid,
        author_id: UserId,
    ) -> Result<bool, StoreError> {
        reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .filter(reviews::Column::AuthorId.eq(author_id.value()))
            .one(&*self.db)
            .await
            .map(|row| row.is_some())
            .map_err(map_db_err)
    }

    async fn create(
        &self,
        title_id: Uuid,
        author_id: UserId,
        draft: ReviewDraft,
    ) -> Result<Review, StoreError> {
        let row = reviews::Model {
            id: Uuid::new_v4(),
            title_id,
            author_id: author_id.value(),
            text: draft.text,
            score: draft.score.value(),
            pub_date: Utc::now().into(),
        };
        let active: reviews::ActiveModel = row.clone().into();

        reviews::Entity::insert(active.reset_all())
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate
                } else {
                    tracing::error!(title_id = %title_id, error = %e, "Failed to insert review");
                    map_db_err(e)
                }
            })?;

        self.with_author(row).await
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, StoreError> {
        let current = reviews::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(StoreError::NotFound)?;

        let mut active: reviews::ActiveModel = current.into();
        if let Some(text) = changes.text {
            active.text = Set(text);
        }
        if let Some(score) = changes.score {
            active.score = Set(score.value());
        }

        let updated = active.update(&*self.db).await.map_err(map_db_err)?;
        self.with_author(updated).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        match Self::delete_with_comments(&txn, id).await {
            Ok(0) => {
                let _ = txn.rollback().await;
                Err(StoreError::NotFound)
            }
            Ok(_) => txn.commit().await.map_err(map_db_err),
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(review_id = %id, error = %e, "Failed to delete review");
                Err(map_db_err(e))
            }
        }
    }
}
