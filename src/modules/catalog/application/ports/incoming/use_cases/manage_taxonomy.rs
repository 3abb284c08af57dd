use async_trait::async_trait;

use crate::catalog::application::domain::entities::TaxonRef;
use crate::shared::api::FieldErrors;

#[derive(Debug, Clone, Default)]
pub struct CreateTaxonCommand {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TaxonomyError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Not found")]
    NotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Categories and genres share this surface; each gets its own instance.
#[async_trait]
pub trait ManageTaxonomyUseCase: Send + Sync {
    async fn list(&self, search: Option<String>) -> Result<Vec<TaxonRef>, TaxonomyError>;

    async fn create(&self, command: CreateTaxonCommand) -> Result<TaxonRef, TaxonomyError>;

    async fn delete(&self, slug: &str) -> Result<(), TaxonomyError>;
}
