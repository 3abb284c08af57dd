use std::sync::Arc;

use crate::review::application::ports::incoming::use_cases::{CommentsUseCase, ReviewsUseCase};

#[derive(Clone)]
pub struct ReviewUseCases {
    pub reviews: Arc<dyn ReviewsUseCase + Send + Sync>,
    pub comments: Arc<dyn CommentsUseCase + Send + Sync>,
}
