use async_trait::async_trait;

use crate::catalog::application::domain::entities::Taxon;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaxon {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyRepositoryError {
    #[error("Slug is already taken")]
    SlugTaken,

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Storage for one classification table (categories or genres).
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Ordered by name; `search` is a case-insensitive substring of the name.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Taxon>, TaxonomyRepositoryError>;

    /// Returns only the entries that exist; callers compare against what they asked for.
    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Taxon>, TaxonomyRepositoryError>;

    async fn create(&self, data: NewTaxon) -> Result<Taxon, TaxonomyRepositoryError>;

    /// Detaches the entry from every title before removing it.
    async fn delete_by_slug(&self, slug: &str) -> Result<(), TaxonomyRepositoryError>;
}
