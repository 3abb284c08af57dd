use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::review::application::domain::entities::{Review, ReviewChanges, ReviewDraft};

use super::StoreError;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Newest first.
    async fn list_for_title(&self, title_id: Uuid) -> Result<Vec<Review>, StoreError>;

    /// `None` when the review does not exist or belongs to another title.
    async fn find_in_title(&self, title_id: Uuid, id: Uuid) -> Result<Option<Review>, StoreError>;

    async fn author_has_review(&self, title_id: Uuid, author_id: UserId)
        -> Result<bool, StoreError>;

    /// Fails with `StoreError::Duplicate` when the unique (title, author) index rejects the row.
    async fn create(
        &self,
        title_id: Uuid,
        author_id: UserId,
        draft: ReviewDraft,
    ) -> Result<Review, StoreError>;

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, StoreError>;

    /// Removes the review together with its comments.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
