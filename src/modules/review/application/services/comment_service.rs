use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::Actor;
use crate::auth::application::domain::policies::{Access, Policy, Principal};
use crate::review::application::domain::entities::{Comment, CommentDraft};
use crate::review::application::helpers::{
    CommentCollection, NestedError, NestedResource, ReviewLookup,
};
use crate::review::application::ports::incoming::use_cases::{
    CommentError, CommentInput, CommentsUseCase, ReviewKey,
};
use crate::review::application::ports::outgoing::{
    CommentRepository, ReviewRepository, StoreError,
};
use crate::shared::api::FieldErrors;

use super::content_checks::check_text;

pub struct CommentService {
    nested: NestedResource<ReviewLookup, CommentCollection>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self {
            nested: NestedResource::new(
                ReviewLookup::new(reviews),
                CommentCollection::new(comments.clone()),
            ),
            comments,
        }
    }

    fn ensure_can_modify(actor: &Actor, comment: &Comment) -> Result<(), CommentError> {
        Policy::ReadOpenWriteAuthorOrStaff
            .check_object(
                Access::Write,
                Some(&Principal::from(actor)),
                comment.is_authored_by(actor.user_id),
            )
            .map_err(CommentError::Denied)
    }
}

fn map_nested_error(err: NestedError) -> CommentError {
    match err {
        NestedError::ParentNotFound => CommentError::ReviewNotFound,
        NestedError::NotFound => CommentError::NotFound,
        // Comments carry no uniqueness rule.
        NestedError::Duplicate => {
            CommentError::RepositoryError("unexpected duplicate comment".to_string())
        }
        NestedError::Store(e) => CommentError::RepositoryError(e),
    }
}

fn map_store_error(err: StoreError) -> CommentError {
    map_nested_error(err.into())
}

#[async_trait]
impl CommentsUseCase for CommentService {
    async fn list(&self, key: ReviewKey) -> Result<Vec<Comment>, CommentError> {
        self.nested.list(key).await.map_err(map_nested_error)
    }

    async fn get(&self, key: ReviewKey, id: Uuid) -> Result<Comment, CommentError> {
        self.nested.get(key, id).await.map_err(map_nested_error)
    }

    async fn create(
        &self,
        key: ReviewKey,
        actor: &Actor,
        input: CommentInput,
    ) -> Result<Comment, CommentError> {
        let mut errors = FieldErrors::new();
        let Some(text) = check_text(&mut errors, input.text, true) else {
            return Err(CommentError::Validation(errors));
        };

        let comment = self
            .nested
            .create(key, actor, CommentDraft { text })
            .await
            .map_err(map_nested_error)?;

        tracing::info!(
            comment_id = %comment.id,
            review_id = %key.review_id,
            author = %actor.username,
            "Comment created"
        );
        Ok(comment)
    }

    async fn patch(
        &self,
        key: ReviewKey,
        id: Uuid,
        actor: &Actor,
        input: CommentInput,
    ) -> Result<Comment, CommentError> {
        let current = self.get(key, id).await?;
        Self::ensure_can_modify(actor, &current)?;

        let mut errors = FieldErrors::new();
        let text = check_text(&mut errors, input.text, false);
        errors.into_result().map_err(CommentError::Validation)?;

        match text {
            None => Ok(current),
            Some(text) => self
                .comments
                .update_text(id, text)
                .await
                .map_err(map_store_error),
        }
    }

    async fn delete(&self, key: ReviewKey, id: Uuid, actor: &Actor) -> Result<(), CommentError> {
        let current = self.get(key, id).await?;
        Self::ensure_can_modify(actor, &current)?;

        self.comments.delete(id).await.map_err(map_store_error)?;

        tracing::info!(comment_id = %id, by = %actor.username, "Comment deleted");
        Ok(())
    }
}
