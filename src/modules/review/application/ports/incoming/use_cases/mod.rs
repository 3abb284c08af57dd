pub mod comments;
pub mod reviews;

pub use comments::{CommentError, CommentInput, CommentsUseCase, ReviewKey};
pub use reviews::{ReviewError, ReviewInput, ReviewsUseCase};
