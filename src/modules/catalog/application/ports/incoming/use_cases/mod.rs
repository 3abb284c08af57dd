pub mod manage_taxonomy;
pub mod titles;

pub use manage_taxonomy::{CreateTaxonCommand, ManageTaxonomyUseCase, TaxonomyError};
pub use titles::{BrowseTitlesUseCase, ManageTitlesUseCase, TitleCommand, TitleError};
