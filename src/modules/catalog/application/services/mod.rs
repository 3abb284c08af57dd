mod taxonomy_service;
mod title_services;

pub use taxonomy_service::TaxonomyService;
pub use title_services::{BrowseTitlesService, ManageTitlesService};
