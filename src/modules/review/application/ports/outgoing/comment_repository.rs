use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::review::application::domain::entities::{Comment, CommentDraft};

use super::StoreError;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first.
    async fn list_for_review(&self, review_id: Uuid) -> Result<Vec<Comment>, StoreError>;

    async fn find_in_review(&self, review_id: Uuid, id: Uuid)
        -> Result<Option<Comment>, StoreError>;

    async fn create(
        &self,
        review_id: Uuid,
        author_id: UserId,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError>;

    async fn update_text(&self, id: Uuid, text: String) -> Result<Comment, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
