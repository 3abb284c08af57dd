use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::catalog::application::ports::outgoing::{
    NewTitle, TitleChanges, TitleRepository, TitleRepositoryError,
};
use crate::review::adapter::outgoing::sea_orm_entity::{comments, reviews};

use super::sea_orm_entity::{title_genres, titles};

#[derive(Clone, Debug)]
pub struct TitleRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl TitleRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn link_genres(
        txn: &DatabaseTransaction,
        title_id: Uuid,
        genre_ids: Vec<Uuid>,
    ) -> Result<(), DbErr> {
        if genre_ids.is_empty() {
            return Ok(());
        }

        let links = genre_ids.into_iter().map(|genre_id| title_genres::ActiveModel {
            title_id: Set(title_id),
            genre_id: Set(genre_id),
        });
        title_genres::Entity::insert_many(links)
            .exec_without_returning(txn)
            .await?;
        Ok(())
    }

    async fn apply_changes(
        txn: &DatabaseTransaction,
        id: Uuid,
        changes: TitleChanges,
    ) -> Result<(), TitleRepositoryError> {
        let exists = titles::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(map_db_err)?
            .is_some();
        if !exists {
            return Err(TitleRepositoryError::NotFound);
        }

        let mut update = titles::Entity::update_many().filter(titles::Column::Id.eq(id));
        let mut touches_columns = false;
        if let Some(name) = changes.name {
            update = update.col_expr(titles::Column::Name, Expr::value(name));
            touches_columns = true;
        }
        if let Some(year) = changes.year {
            update = update.col_expr(titles::Column::Year, Expr::value(year));
            touches_columns = true;
        }
        if let Some(description) = changes.description {
            update = update.col_expr(titles::Column::Description, Expr::value(description));
            touches_columns = true;
        }
        if let Some(category_id) = changes.category_id {
            update = update.col_expr(titles::Column::CategoryId, Expr::value(category_id));
            touches_columns = true;
        }
        if touches_columns {
            update.exec(txn).await.map_err(map_db_err)?;
        }

        if let Some(genre_ids) = changes.genre_ids {
            title_genres::Entity::delete_many()
                .filter(title_genres::Column::TitleId.eq(id))
                .exec(txn)
                .await
                .map_err(map_db_err)?;
            Self::link_genres(txn, id, genre_ids)
                .await
                .map_err(map_db_err)?;
        }

        Ok(())
    }

    /// Comments, reviews and genre links go first so the title row is the last thing removed.
    async fn delete_cascade(txn: &DatabaseTransaction, id: Uuid) -> Result<u64, DbErr> {
        comments::Entity::delete_many()
            .filter(
                comments::Column::ReviewId.in_subquery(
                    Query::select()
                        .column(reviews::Column::Id)
                        .from(reviews::Entity)
                        .and_where(reviews::Column::TitleId.eq(id))
                        .to_owned(),
                ),
            )
            .exec(txn)
            .await?;

        reviews::Entity::delete_many()
            .filter(reviews::Column::TitleId.eq(id))
            .exec(txn)
            .await?;

        title_genres::Entity::delete_many()
            .filter(title_genres::Column::TitleId.eq(id))
            .exec(txn)
            .await?;

        let result = titles::Entity::delete_by_id(id).exec(txn).await?;
        Ok(result.rows_affected)
    }
}

fn map_db_err(e: DbErr) -> TitleRepositoryError {
    TitleRepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl TitleRepository for TitleRepositoryPostgres {
    async fn create(&self, data: NewTitle) -> Result<Uuid, TitleRepositoryError> {
        let id = Uuid::new_v4();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let inserted = titles::Entity::insert(titles::ActiveModel {
            id: Set(id),
            name: Set(data.name),
            year: Set(data.year),
            description: Set(data.description),
            category_id: Set(data.category_id),
        })
        .exec_without_returning(&txn)
        .await;

        let linked = match inserted {
            Ok(_) => Self::link_genres(&txn, id, data.genre_ids).await,
            Err(e) => Err(e),
        };

        if let Err(e) = linked {
            let _ = txn.rollback().await;
            tracing::error!(error = %e, "Failed to insert title");
            return Err(map_db_err(e));
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(id)
    }

    async fn update(&self, id: Uuid, changes: TitleChanges) -> Result<(), TitleRepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        if let Err(e) = Self::apply_changes(&txn, id, changes).await {
            let _ = txn.rollback().await;
            return Err(e);
        }

        txn.commit().await.map_err(map_db_err)
    }

    async fn delete(&self, id: Uuid) -> Result<(), TitleRepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        match Self::delete_cascade(&txn, id).await {
            Ok(0) => {
                let _ = txn.rollback().await;
                Err(TitleRepositoryError::NotFound)
            }
            Ok(_) => txn.commit().await.map_err(map_db_err),
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(title_id = %id, error = %e, "Failed to delete title");
                Err(map_db_err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn ok_exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    fn statement_log(db: Arc<DatabaseConnection>) -> String {
        let db = Arc::try_unwrap(db).expect("repository still holds the connection");
        format!("{:?}", db.into_transaction_log())
    }

    fn stored(id: Uuid) -> titles::Model {
        titles::Model {
            id,
            name: "Dune".into(),
            year: 1965,
            description: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn create_inserts_title_and_links() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // INSERT title
            .append_exec_results([ok_exec(1)])
            // INSERT links
            .append_exec_results([ok_exec(2)])
            // commit (transaction)
            .append_exec_results([ok_exec(0)])
            .into_connection();
        let repo = TitleRepositoryPostgres::new(Arc::new(db));

        let id = repo
            .create(NewTitle {
                name: "Dune".into(),
                year: 1965,
                description: None,
                category_id: None,
                genre_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            })
            .await
            .unwrap();

        assert!(!id.is_nil());
    }

    #[tokio::test]
    async fn create_failure_is_reported() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("foreign key violation".into())])
            .append_exec_results([ok_exec(0)])
            .into_connection();
        let repo = TitleRepositoryPostgres::new(Arc::new(db));

        let err = repo
            .create(NewTitle {
                name: "Dune".into(),
                year: 1965,
                description: None,
                category_id: Some(Uuid::new_v4()),
                genre_ids: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TitleRepositoryError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn update_replaces_genre_set() {
        let id = Uuid::new_v4();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![stored(id)]])
                // UPDATE titles
                .append_exec_results([ok_exec(1)])
                // DELETE links
                .append_exec_results([ok_exec(2)])
                // INSERT links
                .append_exec_results([ok_exec(1)])
                .append_exec_results([ok_exec(0)])
                .into_connection(),
        );
        let repo = TitleRepositoryPostgres::new(db.clone());

        repo.update(
            id,
            TitleChanges {
                year: Some(1966),
                genre_ids: Some(vec![Uuid::new_v4()]),
                ..TitleChanges::default()
            },
        )
        .await
        .unwrap();
        drop(repo);

        let log = statement_log(db);
        assert!(log.contains("UPDATE"), "{log}");
        assert!(log.contains("DELETE FROM"), "{log}");
        assert!(log.contains("INSERT INTO"), "{log}");
    }

    #[tokio::test]
    async fn update_missing_title_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<titles::Model>::new()])
            .append_exec_results([ok_exec(0)])
            .into_connection();
        let repo = TitleRepositoryPostgres::new(Arc::new(db));

        let err = repo
            .update(
                Uuid::new_v4(),
                TitleChanges {
                    name: Some("x".into()),
                    ..TitleChanges::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err, TitleRepositoryError::NotFound);
    }

    #[tokio::test]
    async fn delete_removes_comments_and_reviews_with_the_title() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // comments of the title's reviews
                .append_exec_results([ok_exec(4)])
                // reviews
                .append_exec_results([ok_exec(2)])
                // genre links
                .append_exec_results([ok_exec(1)])
                // title
                .append_exec_results([ok_exec(1)])
                .append_exec_results([ok_exec(0)])
                .into_connection(),
        );
        let repo = TitleRepositoryPostgres::new(db.clone());

        repo.delete(Uuid::new_v4()).await.unwrap();
        drop(repo);

        let log = statement_log(db);
        let comments_at = log.find("\\\"comments\\\"").expect("comments delete");
        let reviews_at = log.find("DELETE FROM \\\"reviews\\\"").expect("reviews delete");
        let title_at = log.find("DELETE FROM \\\"titles\\\"").expect("title delete");
        assert!(comments_at < reviews_at && reviews_at < title_at, "{log}");
    }

    #[tokio::test]
    async fn delete_missing_title_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([ok_exec(0), ok_exec(0), ok_exec(0), ok_exec(0)])
            .append_exec_results([ok_exec(0)])
            .into_connection();
        let repo = TitleRepositoryPostgres::new(Arc::new(db));

        assert_eq!(
            repo.delete(Uuid::new_v4()).await,
            Err(TitleRepositoryError::NotFound)
        );
    }
}
