pub mod comment_repository;
pub mod review_repository;
pub mod store_error;
pub mod title_directory;

pub use comment_repository::CommentRepository;
pub use review_repository::ReviewRepository;
pub use store_error::StoreError;
pub use title_directory::TitleDirectory;
