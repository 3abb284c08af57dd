mod author_names;
pub mod comment_repository_postgres;
pub mod review_repository_postgres;
pub mod sea_orm_entity;
pub mod title_directory_postgres;

pub use comment_repository_postgres::CommentRepositoryPostgres;
pub use review_repository_postgres::ReviewRepositoryPostgres;
pub use title_directory_postgres::TitleDirectoryPostgres;
