pub mod taxonomy_repository;
pub mod title_query;
pub mod title_repository;

pub use taxonomy_repository::{NewTaxon, TaxonomyRepository, TaxonomyRepositoryError};
pub use title_query::{TitleFilter, TitleQuery, TitleQueryError};
pub use title_repository::{NewTitle, TitleChanges, TitleRepository, TitleRepositoryError};
