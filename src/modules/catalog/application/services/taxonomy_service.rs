use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::application::domain::entities::{TaxonRef, TaxonomyKind};
use crate::catalog::application::domain::naming::{validate_display_name, Slug};
use crate::catalog::application::ports::incoming::use_cases::{
    CreateTaxonCommand, ManageTaxonomyUseCase, TaxonomyError,
};
use crate::catalog::application::ports::outgoing::{
    NewTaxon, TaxonomyRepository, TaxonomyRepositoryError,
};
use crate::shared::api::FieldErrors;

pub struct TaxonomyService {
    kind: TaxonomyKind,
    repository: Arc<dyn TaxonomyRepository>,
}

impl TaxonomyService {
    pub fn new(kind: TaxonomyKind, repository: Arc<dyn TaxonomyRepository>) -> Self {
        Self { kind, repository }
    }

    fn map_repo_error(&self, err: TaxonomyRepositoryError) -> TaxonomyError {
        match err {
            TaxonomyRepositoryError::SlugTaken => TaxonomyError::Validation(FieldErrors::single(
                "slug",
                format!("{} with this slug already exists.", self.kind.label()),
            )),
            TaxonomyRepositoryError::NotFound => TaxonomyError::NotFound,
            TaxonomyRepositoryError::DatabaseError(e) => TaxonomyError::RepositoryError(e),
        }
    }
}

#[async_trait]
impl ManageTaxonomyUseCase for TaxonomyService {
    async fn list(&self, search: Option<String>) -> Result<Vec<TaxonRef>, TaxonomyError> {
        let search = search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let entries = self
            .repository
            .list(search)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(entries.into_iter().map(TaxonRef::from).collect())
    }

    async fn create(&self, command: CreateTaxonCommand) -> Result<TaxonRef, TaxonomyError> {
        let mut errors = FieldErrors::new();

        let name = match command.name.as_deref().map(str::trim) {
            None | Some("") => {
                errors.required("name");
                None
            }
            Some(raw) => validate_display_name(raw)
                .map_err(|msg| errors.add("name", msg))
                .ok(),
        };

        let slug = match command.slug.as_deref().map(str::trim) {
            None | Some("") => {
                errors.required("slug");
                None
            }
            Some(raw) => Slug::parse(raw)
                .map_err(|e| errors.add("slug", e.to_string()))
                .ok(),
        };

        let (Some(name), Some(slug)) = (name, slug) else {
            return Err(TaxonomyError::Validation(errors));
        };

        let created = self
            .repository
            .create(NewTaxon {
                name,
                slug: slug.into_inner(),
            })
            .await
            .map_err(|e| self.map_repo_error(e))?;

        tracing::info!(kind = self.kind.as_str(), slug = %created.slug, "Taxonomy entry created");
        Ok(created.into())
    }

    async fn delete(&self, slug: &str) -> Result<(), TaxonomyError> {
        self.repository
            .delete_by_slug(slug)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        tracing::info!(kind = self.kind.as_str(), slug = %slug, "Taxonomy entry deleted");
        Ok(())
    }
}
