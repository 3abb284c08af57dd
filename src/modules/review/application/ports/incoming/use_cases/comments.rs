use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::Actor;
use crate::auth::application::domain::policies::Denial;
use crate::review::application::domain::entities::Comment;
use crate::shared::api::FieldErrors;

/// Where a comment lives: the review and the title that review belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewKey {
    pub title_id: Uuid,
    pub review_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct CommentInput {
    pub text: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommentError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Comment not found")]
    NotFound,

    #[error("{0}")]
    Denied(Denial),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait CommentsUseCase: Send + Sync {
    async fn list(&self, key: ReviewKey) -> Result<Vec<Comment>, CommentError>;

    async fn get(&self, key: ReviewKey, id: Uuid) -> Result<Comment, CommentError>;

    async fn create(
        &self,
        key: ReviewKey,
        actor: &Actor,
        input: CommentInput,
    ) -> Result<Comment, CommentError>;

    async fn patch(
        &self,
        key: ReviewKey,
        id: Uuid,
        actor: &Actor,
        input: CommentInput,
    ) -> Result<Comment, CommentError>;

    async fn delete(&self, key: ReviewKey, id: Uuid, actor: &Actor) -> Result<(), CommentError>;
}
