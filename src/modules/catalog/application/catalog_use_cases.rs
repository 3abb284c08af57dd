use std::sync::Arc;

use crate::catalog::application::ports::incoming::use_cases::{
    BrowseTitlesUseCase, ManageTaxonomyUseCase, ManageTitlesUseCase,
};

#[derive(Clone)]
pub struct CatalogUseCases {
    pub categories: Arc<dyn ManageTaxonomyUseCase + Send + Sync>,
    pub genres: Arc<dyn ManageTaxonomyUseCase + Send + Sync>,
    pub browse_titles: Arc<dyn BrowseTitlesUseCase + Send + Sync>,
    pub manage_titles: Arc<dyn ManageTitlesUseCase + Send + Sync>,
}
