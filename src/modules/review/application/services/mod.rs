mod comment_service;
mod content_checks;
mod review_service;

pub use comment_service::CommentService;
pub use review_service::ReviewService;
