use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::catalog::application::domain::entities::{rating_from_mean, TaxonRef, Title};
use crate::catalog::application::ports::outgoing::{TitleFilter, TitleQuery, TitleQueryError};
use crate::review::adapter::outgoing::sea_orm_entity::reviews;
use crate::shared::db::contains_pattern;

use super::sea_orm_entity::{categories, genres, title_genres, titles};

#[derive(Clone, Debug)]
pub struct TitleQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl TitleQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> TitleQueryError {
    TitleQueryError::DatabaseError(e.to_string())
}

#[derive(Debug, FromQueryResult)]
struct RatingRow {
    title_id: Uuid,
    rating: Option<f64>,
}

impl TitleQueryPostgres {
    /// Attaches category, genres and rating to a page of title rows.
    ///
    /// Issues at most four extra queries regardless of how many titles are passed.
    async fn hydrate(&self, rows: Vec<titles::Model>) -> Result<Vec<Title>, TitleQueryError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let db = &*self.db;
        let title_ids: Vec<Uuid> = rows.iter().map(|t| t.id).collect();

        let mut category_ids: Vec<Uuid> = rows.iter().filter_map(|t| t.category_id).collect();
        category_ids.sort();
        category_ids.dedup();
        let category_refs: HashMap<Uuid, TaxonRef> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            categories::Entity::find()
                .filter(categories::Column::Id.is_in(category_ids))
                .all(db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|c| {
                    (
                        c.id,
                        TaxonRef {
                            name: c.name,
                            slug: c.slug,
                        },
                    )
                })
                .collect()
        };

        let links = title_genres::Entity::find()
            .filter(title_genres::Column::TitleId.is_in(title_ids.clone()))
            .all(db)
            .await
            .map_err(map_db_err)?;

        let mut genre_ids: Vec<Uuid> = links.iter().map(|l| l.genre_id).collect();
        genre_ids.sort();
        genre_ids.dedup();
        let genre_refs: HashMap<Uuid, TaxonRef> = if genre_ids.is_empty() {
            HashMap::new()
        } else {
            genres::Entity::find()
                .filter(genres::Column::Id.is_in(genre_ids))
                .all(db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|g| {
                    (
                        g.id,
                        TaxonRef {
                            name: g.name,
                            slug: g.slug,
                        },
                    )
                })
                .collect()
        };

        let ratings: HashMap<Uuid, Option<f64>> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::TitleId)
            .column_as(
                Expr::cust("CAST(AVG(score) AS DOUBLE PRECISION)"),
                "rating",
            )
            .filter(reviews::Column::TitleId.is_in(title_ids))
            .group_by(reviews::Column::TitleId)
            .into_model::<RatingRow>()
            .all(db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|r| (r.title_id, r.rating))
            .collect();

        let mut genres_by_title: HashMap<Uuid, Vec<TaxonRef>> = HashMap::new();
        for link in links {
            if let Some(genre) = genre_refs.get(&link.genre_id) {
                genres_by_title
                    .entry(link.title_id)
                    .or_default()
                    .push(genre.clone());
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut genre_list = genres_by_title.remove(&row.id).unwrap_or_default();
                genre_list.sort_by(|a, b| a.name.cmp(&b.name));

                Title {
                    id: row.id,
                    rating: rating_from_mean(ratings.get(&row.id).copied().flatten()),
                    category: row.category_id.and_then(|id| category_refs.get(&id).cloned()),
                    genres: genre_list,
                    name: row.name,
                    year: row.year,
                    description: row.description,
                }
            })
            .collect())
    }
}

#[async_trait]
impl TitleQuery for TitleQueryPostgres {
    async fn list(&self, filter: &TitleFilter) -> Result<Vec<Title>, TitleQueryError> {
        let mut query = titles::Entity::find().order_by_asc(titles::Column::Name);

        if let Some(name) = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            query = query.filter(Expr::col(titles::Column::Name).ilike(contains_pattern(name)));
        }

        if let Some(year) = filter.year {
            query = query.filter(titles::Column::Year.eq(year));
        }

        if let Some(slug) = filter.category.as_deref() {
            query = query.filter(
                titles::Column::CategoryId.in_subquery(
                    Query::select()
                        .column(categories::Column::Id)
                        .from(categories::Entity)
                        .and_where(categories::Column::Slug.eq(slug))
                        .to_owned(),
                ),
            );
        }

        if let Some(slug) = filter.genre.as_deref() {
            query = query.filter(
                titles::Column::Id.in_subquery(
                    Query::select()
                        .column((title_genres::Entity, title_genres::Column::TitleId))
                        .from(title_genres::Entity)
                        .inner_join(
                            genres::Entity,
                            Expr::col((genres::Entity, genres::Column::Id))
                                .equals((title_genres::Entity, title_genres::Column::GenreId)),
                        )
                        .and_where(Expr::col((genres::Entity, genres::Column::Slug)).eq(slug))
                        .to_owned(),
                ),
            );
        }

        let rows = query.all(&*self.db).await.map_err(map_db_err)?;
        self.hydrate(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Title>, TitleQueryError> {
        let Some(row) = titles::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }
}
