use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::Actor;
use crate::auth::application::domain::policies::Denial;
use crate::review::application::domain::entities::Review;
use crate::shared::api::FieldErrors;

//
// ──────────────────────────────────────────────────────────
// Input
// ──────────────────────────────────────────────────────────
//

/// Review body for create and patch. `score` is kept wide so out-of-range
/// numbers reach validation instead of failing deserialization.
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub text: Option<String>,
    pub score: Option<i64>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReviewError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Title not found")]
    TitleNotFound,

    #[error("Review not found")]
    NotFound,

    #[error("{0}")]
    Denied(Denial),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

#[async_trait]
pub trait ReviewsUseCase: Send + Sync {
    async fn list(&self, title_id: Uuid) -> Result<Vec<Review>, ReviewError>;

    async fn get(&self, title_id: Uuid, id: Uuid) -> Result<Review, ReviewError>;

    async fn create(
        &self,
        title_id: Uuid,
        actor: &Actor,
        input: ReviewInput,
    ) -> Result<Review, ReviewError>;

    async fn patch(
        &self,
        title_id: Uuid,
        id: Uuid,
        actor: &Actor,
        input: ReviewInput,
    ) -> Result<Review, ReviewError>;

    async fn delete(&self, title_id: Uuid, id: Uuid, actor: &Actor) -> Result<(), ReviewError>;
}
