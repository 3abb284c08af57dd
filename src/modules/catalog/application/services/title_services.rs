use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::application::domain::entities::Title;
use crate::catalog::application::domain::naming::validate_display_name;
use crate::catalog::application::ports::incoming::use_cases::{
    BrowseTitlesUseCase, ManageTitlesUseCase, TitleCommand, TitleError,
};
use crate::catalog::application::ports::outgoing::{
    NewTitle, TaxonomyRepository, TaxonomyRepositoryError, TitleChanges, TitleFilter, TitleQuery,
    TitleQueryError, TitleRepository, TitleRepositoryError,
};
use crate::shared::api::FieldErrors;

fn query_error(err: TitleQueryError) -> TitleError {
    match err {
        TitleQueryError::DatabaseError(e) => TitleError::RepositoryError(e),
    }
}

fn repository_error(err: TitleRepositoryError) -> TitleError {
    match err {
        TitleRepositoryError::NotFound => TitleError::NotFound,
        TitleRepositoryError::DatabaseError(e) => TitleError::RepositoryError(e),
    }
}

fn taxonomy_error(err: TaxonomyRepositoryError) -> TitleError {
    TitleError::RepositoryError(err.to_string())
}

fn unknown_slug(slug: &str) -> String {
    format!("Object with slug={slug} does not exist.")
}

// ──────────────────────────────────────────────────────────
// Reads
// ──────────────────────────────────────────────────────────

pub struct BrowseTitlesService {
    query: Arc<dyn TitleQuery>,
}

impl BrowseTitlesService {
    pub fn new(query: Arc<dyn TitleQuery>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl BrowseTitlesUseCase for BrowseTitlesService {
    async fn list(&self, filter: TitleFilter) -> Result<Vec<Title>, TitleError> {
        self.query.list(&filter).await.map_err(query_error)
    }

    async fn get(&self, id: Uuid) -> Result<Title, TitleError> {
        self.query
            .find_by_id(id)
            .await
            .map_err(query_error)?
            .ok_or(TitleError::NotFound)
    }
}

// ──────────────────────────────────────────────────────────
// Writes
// ──────────────────────────────────────────────────────────

pub struct ManageTitlesService {
    query: Arc<dyn TitleQuery>,
    repository: Arc<dyn TitleRepository>,
    categories: Arc<dyn TaxonomyRepository>,
    genres: Arc<dyn TaxonomyRepository>,
}

impl ManageTitlesService {
    pub fn new(
        query: Arc<dyn TitleQuery>,
        repository: Arc<dyn TitleRepository>,
        categories: Arc<dyn TaxonomyRepository>,
        genres: Arc<dyn TaxonomyRepository>,
    ) -> Self {
        Self {
            query,
            repository,
            categories,
            genres,
        }
    }

    /// `Some(None)` clears the category; an unknown slug is recorded on `errors`.
    async fn resolve_category(
        &self,
        slug: Option<String>,
        errors: &mut FieldErrors,
    ) -> Result<Option<Uuid>, TitleError> {
        let Some(slug) = slug.map(|s| s.trim().to_string()) else {
            return Ok(None);
        };

        let found = self
            .categories
            .find_by_slugs(std::slice::from_ref(&slug))
            .await
            .map_err(taxonomy_error)?;

        match found.into_iter().next() {
            Some(category) => Ok(Some(category.id)),
            None => {
                errors.add("category", unknown_slug(&slug));
                Ok(None)
            }
        }
    }

    /// Ids in request order with duplicates dropped.
    async fn resolve_genres(
        &self,
        slugs: Vec<String>,
        errors: &mut FieldErrors,
    ) -> Result<Vec<Uuid>, TitleError> {
        let mut wanted: Vec<String> = Vec::with_capacity(slugs.len());
        for slug in slugs.into_iter().map(|s| s.trim().to_string()) {
            if !wanted.contains(&slug) {
                wanted.push(slug);
            }
        }
        if wanted.is_empty() {
            return Ok(vec![]);
        }

        let found = self
            .genres
            .find_by_slugs(&wanted)
            .await
            .map_err(taxonomy_error)?;

        let mut ids = Vec::with_capacity(wanted.len());
        for slug in &wanted {
            match found.iter().find(|g| &g.slug == slug) {
                Some(genre) => ids.push(genre.id),
                None => errors.add("genre", unknown_slug(slug)),
            }
        }
        Ok(ids)
    }

    async fn reload(&self, id: Uuid) -> Result<Title, TitleError> {
        self.query
            .find_by_id(id)
            .await
            .map_err(query_error)?
            .ok_or(TitleError::NotFound)
    }
}

fn check_name(raw: Option<String>, required: bool, errors: &mut FieldErrors) -> Option<String> {
    match raw {
        None if required => {
            errors.required("name");
            None
        }
        None => None,
        Some(raw) => validate_display_name(&raw)
            .map_err(|msg| errors.add("name", msg))
            .ok(),
    }
}

#[async_trait]
impl ManageTitlesUseCase for ManageTitlesService {
    async fn create(&self, command: TitleCommand) -> Result<Title, TitleError> {
        let mut errors = FieldErrors::new();

        let name = check_name(command.name, true, &mut errors);
        if command.year.is_none() {
            errors.required("year");
        }
        let category_id = self
            .resolve_category(command.category.flatten(), &mut errors)
            .await?;
        let genre_ids = self
            .resolve_genres(command.genre.unwrap_or_default(), &mut errors)
            .await?;

        let (Some(name), Some(year)) = (name, command.year) else {
            return Err(TitleError::Validation(errors));
        };
        errors.into_result().map_err(TitleError::Validation)?;

        let id = self
            .repository
            .create(NewTitle {
                name,
                year,
                description: command.description.flatten(),
                category_id,
                genre_ids,
            })
            .await
            .map_err(repository_error)?;

        tracing::info!(title_id = %id, "Title created");
        self.reload(id).await
    }

    async fn patch(&self, id: Uuid, command: TitleCommand) -> Result<Title, TitleError> {
        let current = self.reload(id).await?;
        let mut errors = FieldErrors::new();

        let name = check_name(command.name, false, &mut errors);
        let category_id = match command.category {
            None => None,
            Some(slug) => Some(self.resolve_category(slug, &mut errors).await?),
        };
        let genre_ids = match command.genre {
            None => None,
            Some(slugs) => Some(self.resolve_genres(slugs, &mut errors).await?),
        };
        errors.into_result().map_err(TitleError::Validation)?;

        let changes = TitleChanges {
            name,
            year: command.year,
            description: command.description,
            category_id,
            genre_ids,
        };
        if changes.is_empty() {
            return Ok(current);
        }

        self.repository
            .update(id, changes)
            .await
            .map_err(repository_error)?;

        tracing::info!(title_id = %id, "Title updated");
        self.reload(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), TitleError> {
        self.repository.delete(id).await.map_err(repository_error)?;
        tracing::info!(title_id = %id, "Title deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::in_memory_catalog::{InMemoryTaxonomy, InMemoryTitles};

    fn catalog() -> InMemoryTitles {
        InMemoryTitles::new(
            InMemoryTaxonomy::with(&[("Books", "books"), ("Films", "films")]),
            InMemoryTaxonomy::with(&[("Drama", "drama"), ("Fantasy", "fantasy")]),
        )
    }

    fn manage(store: &InMemoryTitles) -> ManageTitlesService {
        ManageTitlesService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.categories.clone()),
            Arc::new(store.genres.clone()),
        )
    }

    fn browse(store: &InMemoryTitles) -> BrowseTitlesService {
        BrowseTitlesService::new(Arc::new(store.clone()))
    }

    fn dune() -> TitleCommand {
        TitleCommand {
            name: Some("Dune".into()),
            year: Some(1965),
            description: Some(Some("Spice".into())),
            category: Some(Some("books".into())),
            genre: Some(vec!["fantasy".into(), "drama".into(), "fantasy".into()]),
        }
    }

    #[tokio::test]
    async fn create_resolves_slugs_and_expands_them() {
        let store = catalog();

        let title = manage(&store).create(dune()).await.unwrap();

        assert_eq!(title.name, "Dune");
        assert_eq!(title.category.unwrap().slug, "books");
        let genres: Vec<_> = title.genres.iter().map(|g| g.slug.as_str()).collect();
        assert_eq!(genres, vec!["drama", "fantasy"]);
        assert_eq!(title.rating, None);
    }

    #[tokio::test]
    async fn create_requires_name_and_year() {
        let store = catalog();

        let err = manage(&store)
            .create(TitleCommand::default())
            .await
            .unwrap_err();

        match err {
            TitleError::Validation(fields) => {
                assert!(fields.contains("name"));
                assert!(fields.contains("year"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_slugs_are_field_errors() {
        let store = catalog();
        let command = TitleCommand {
            category: Some(Some("games".into())),
            genre: Some(vec!["drama".into(), "horror".into()]),
            ..dune()
        };

        let err = manage(&store).create(command).await.unwrap_err();

        match err {
            TitleError::Validation(fields) => {
                assert_eq!(
                    fields.get("category"),
                    Some(&["Object with slug=games does not exist.".to_string()][..])
                );
                assert_eq!(
                    fields.get("genre"),
                    Some(&["Object with slug=horror does not exist.".to_string()][..])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(browse(&store)
            .list(TitleFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn patch_touches_only_sent_fields() {
        let store = catalog();
        let created = manage(&store).create(dune()).await.unwrap();

        let patched = manage(&store)
            .patch(
                created.id,
                TitleCommand {
                    year: Some(1966),
                    category: Some(None),
                    ..TitleCommand::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.year, 1966);
        assert_eq!(patched.name, "Dune");
        assert_eq!(patched.category, None);
        assert_eq!(patched.genres.len(), 2);
        assert_eq!(patched.description.as_deref(), Some("Spice"));
    }

    #[tokio::test]
    async fn patch_unknown_title_is_not_found() {
        let store = catalog();

        let err = manage(&store)
            .patch(Uuid::new_v4(), TitleCommand::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TitleError::NotFound));
    }

    #[tokio::test]
    async fn rating_is_truncated_mean_or_null() {
        let store = catalog();
        let rated = store.insert("Rated", 2000);
        let unrated = store.insert("Unrated", 2001);
        store.add_score(rated, 7);
        store.add_score(rated, 8);

        assert_eq!(browse(&store).get(rated).await.unwrap().rating, Some(7));
        assert_eq!(browse(&store).get(unrated).await.unwrap().rating, None);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = catalog();
        let id = store.insert("Gone", 1999);

        manage(&store).delete(id).await.unwrap();

        assert!(matches!(
            browse(&store).get(id).await,
            Err(TitleError::NotFound)
        ));
        assert!(matches!(
            manage(&store).delete(id).await,
            Err(TitleError::NotFound)
        ));
    }
}
