//! The two nestings of the API: reviews under a title, comments under a review.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::review::application::domain::entities::{Comment, CommentDraft, Review, ReviewDraft};
use crate::review::application::ports::incoming::use_cases::ReviewKey;
use crate::review::application::ports::outgoing::{
    CommentRepository, ReviewRepository, StoreError, TitleDirectory,
};

use super::nested_resource::{ChildCollection, ParentLookup};

/// A title known to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewedTitle {
    pub id: Uuid,
}

pub struct TitleLookup {
    titles: Arc<dyn TitleDirectory>,
}

impl TitleLookup {
    pub fn new(titles: Arc<dyn TitleDirectory>) -> Self {
        Self { titles }
    }
}

#[async_trait]
impl ParentLookup for TitleLookup {
    type Key = Uuid;
    type Parent = ReviewedTitle;

    async fn find_parent(&self, title_id: Uuid) -> Result<Option<ReviewedTitle>, StoreError> {
        Ok(self
            .titles
            .exists(title_id)
            .await?
            .then_some(ReviewedTitle { id: title_id }))
    }
}

pub struct ReviewCollection {
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewCollection {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }
}

#[async_trait]
impl ChildCollection<ReviewedTitle> for ReviewCollection {
    type Child = Review;
    type Draft = ReviewDraft;

    async fn list_for(&self, title: &ReviewedTitle) -> Result<Vec<Review>, StoreError> {
        self.reviews.list_for_title(title.id).await
    }

    async fn find_in(&self, title: &ReviewedTitle, id: Uuid) -> Result<Option<Review>, StoreError> {
        self.reviews.find_in_title(title.id, id).await
    }

    async fn insert_into(
        &self,
        title: &ReviewedTitle,
        author: UserId,
        draft: ReviewDraft,
    ) -> Result<Review, StoreError> {
        self.reviews.create(title.id, author, draft).await
    }
}

/// Resolves a review only when it belongs to the title in the same URL.
pub struct ReviewLookup {
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewLookup {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }
}

#[async_trait]
impl ParentLookup for ReviewLookup {
    type Key = ReviewKey;
    type Parent = Review;

    async fn find_parent(&self, key: ReviewKey) -> Result<Option<Review>, StoreError> {
        self.reviews.find_in_title(key.title_id, key.review_id).await
    }
}

pub struct CommentCollection {
    comments: Arc<dyn CommentRepository>,
}

impl CommentCollection {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }
}

#[async_trait]
impl ChildCollection<Review> for CommentCollection {
    type Child = Comment;
    type Draft = CommentDraft;

    async fn list_for(&self, review: &Review) -> Result<Vec<Comment>, StoreError> {
        self.comments.list_for_review(review.id).await
    }

    async fn find_in(&self, review: &Review, id: Uuid) -> Result<Option<Comment>, StoreError> {
        self.comments.find_in_review(review.id, id).await
    }

    async fn insert_into(
        &self,
        review: &Review,
        author: UserId,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError> {
        self.comments.create(review.id, author, draft).await
    }
}
