use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::application::domain::entities::{Taxon, TaxonomyKind};
use crate::catalog::application::ports::outgoing::{
    NewTaxon, TaxonomyRepository, TaxonomyRepositoryError,
};
use crate::shared::db::{contains_pattern, is_unique_violation};

use super::sea_orm_entity::{categories, genres, title_genres, titles};

/// One adapter type for both classification tables; `kind` picks the table.
#[derive(Clone, Debug)]
pub struct TaxonomyRepositoryPostgres {
    db: Arc<DatabaseConnection>,
    kind: TaxonomyKind,
}

impl TaxonomyRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>, kind: TaxonomyKind) -> Self {
        Self { db, kind }
    }

    pub fn categories(db: Arc<DatabaseConnection>) -> Self {
        Self::new(db, TaxonomyKind::Category)
    }

    pub fn genres(db: Arc<DatabaseConnection>) -> Self {
        Self::new(db, TaxonomyKind::Genre)
    }

    async fn find_id_in(
        &self,
        txn: &DatabaseTransaction,
        slug: &str,
    ) -> Result<Option<Uuid>, DbErr> {
        Ok(match self.kind {
            TaxonomyKind::Category => categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug))
                .one(txn)
                .await?
                .map(|m| m.id),
            TaxonomyKind::Genre => genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug))
                .one(txn)
                .await?
                .map(|m| m.id),
        })
    }

    /// Unlinks titles, then removes the row. Returns false when nothing matched.
    async fn detach_and_delete(&self, txn: &DatabaseTransaction, slug: &str) -> Result<bool, DbErr> {
        let Some(id) = self.find_id_in(txn, slug).await? else {
            return Ok(false);
        };

        match self.kind {
            TaxonomyKind::Category => {
                titles::Entity::update_many()
                    .col_expr(titles::Column::CategoryId, Expr::value(Option::<Uuid>::None))
                    .filter(titles::Column::CategoryId.eq(id))
                    .exec(txn)
                    .await?;
                categories::Entity::delete_by_id(id).exec(txn).await?;
            }
            TaxonomyKind::Genre => {
                title_genres::Entity::delete_many()
                    .filter(title_genres::Column::GenreId.eq(id))
                    .exec(txn)
                    .await?;
                genres::Entity::delete_by_id(id).exec(txn).await?;
            }
        }
        Ok(true)
    }
}

fn map_db_err(e: DbErr) -> TaxonomyRepositoryError {
    TaxonomyRepositoryError::DatabaseError(e.to_string())
}

fn map_write_err(e: DbErr) -> TaxonomyRepositoryError {
    if is_unique_violation(&e) {
        TaxonomyRepositoryError::SlugTaken
    } else {
        map_db_err(e)
    }
}

fn category_to_taxon(m: categories::Model) -> Taxon {
    Taxon {
        id: m.id,
        name: m.name,
        slug: m.slug,
    }
}

fn genre_to_taxon(m: genres::Model) -> Taxon {
    Taxon {
        id: m.id,
        name: m.name,
        slug: m.slug,
    }
}

#[async_trait]
impl TaxonomyRepository for TaxonomyRepositoryPostgres {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Taxon>, TaxonomyRepositoryError> {
        let taxa = match self.kind {
            TaxonomyKind::Category => {
                let mut query = categories::Entity::find().order_by_asc(categories::Column::Name);
                if let Some(term) = search {
                    query = query
                        .filter(Expr::col(categories::Column::Name).ilike(contains_pattern(term)));
                }
                query
                    .all(&*self.db)
                    .await
                    .map_err(map_db_err)?
                    .into_iter()
                    .map(category_to_taxon)
                    .collect()
            }
            TaxonomyKind::Genre => {
                let mut query = genres::Entity::find().order_by_asc(genres::Column::Name);
                if let Some(term) = search {
                    query =
                        query.filter(Expr::col(genres::Column::Name).ilike(contains_pattern(term)));
                }
                query
                    .all(&*self.db)
                    .await
                    .map_err(map_db_err)?
                    .into_iter()
                    .map(genre_to_taxon)
                    .collect()
            }
        };

        Ok(taxa)
    }

    async fn find_by_slugs(
        &self,
        slugs: &[String],
    ) -> Result<Vec<Taxon>, TaxonomyRepositoryError> {
        if slugs.is_empty() {
            return Ok(vec![]);
        }

        let taxa = match self.kind {
            TaxonomyKind::Category => categories::Entity::find()
                .filter(categories::Column::Slug.is_in(slugs.iter().cloned()))
                .all(&*self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(category_to_taxon)
                .collect(),
            TaxonomyKind::Genre => genres::Entity::find()
                .filter(genres::Column::Slug.is_in(slugs.iter().cloned()))
                .all(&*self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(genre_to_taxon)
                .collect(),
        };

        Ok(taxa)
    }

    async fn create(&self, data: NewTaxon) -> Result<Taxon, TaxonomyRepositoryError> {
        let id = Uuid::new_v4();

        let taxon = match self.kind {
            TaxonomyKind::Category => categories::ActiveModel {
                id: Set(id),
                name: Set(data.name),
                slug: Set(data.slug),
            }
            .insert(&*self.db)
            .await
            .map(category_to_taxon),
            TaxonomyKind::Genre => genres::ActiveModel {
                id: Set(id),
                name: Set(data.name),
                slug: Set(data.slug),
            }
            .insert(&*self.db)
            .await
            .map(genre_to_taxon),
        };

        taxon.map_err(map_write_err)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), TaxonomyRepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        match self.detach_and_delete(&txn, slug).await {
            Ok(true) => txn.commit().await.map_err(map_db_err),
            Ok(false) => {
                let _ = txn.rollback().await;
                Err(TaxonomyRepositoryError::NotFound)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                tracing::error!(kind = self.kind.as_str(), slug = %slug, error = %e, "Failed to delete taxonomy entry");
                Err(map_db_err(e))
            }
        }
    }
}
