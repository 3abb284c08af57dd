pub mod sea_orm_entity;
pub mod taxonomy_repository_postgres;
pub mod title_query_postgres;
pub mod title_repository_postgres;

pub use taxonomy_repository_postgres::TaxonomyRepositoryPostgres;
pub use title_query_postgres::TitleQueryPostgres;
pub use title_repository_postgres::TitleRepositoryPostgres;
