//! In-memory review and comment store backed by an [`InMemoryUserStore`] for author names.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::review::application::domain::entities::{
    Comment, CommentDraft, Review, ReviewChanges, ReviewDraft,
};
use crate::review::application::ports::outgoing::{
    CommentRepository, ReviewRepository, StoreError, TitleDirectory,
};

use super::in_memory::InMemoryUserStore;

#[derive(Clone, Default)]
pub struct InMemoryReviewStore {
    users: InMemoryUserStore,
    titles: Arc<Mutex<HashSet<Uuid>>>,
    reviews: Arc<Mutex<Vec<Review>>>,
    comments: Arc<Mutex<Vec<Comment>>>,
    /// Ticks forward on every insert so ordering by `pub_date` is stable.
    clock: Arc<Mutex<i64>>,
}

impl InMemoryReviewStore {
    pub fn new(users: InMemoryUserStore) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub fn add_title(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.titles.lock().unwrap().insert(id);
        id
    }

    pub fn review(&self, id: Uuid) -> Option<Review> {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn comment(&self, id: Uuid) -> Option<Comment> {
        self.comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.lock().unwrap().len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }

    fn author_name(&self, author_id: UserId) -> String {
        self.users
            .by_id(author_id)
            .map(|u| u.username)
            .unwrap_or_default()
    }

    fn next_timestamp(&self) -> chrono::DateTime<Utc> {
        let mut tick = self.clock.lock().unwrap();
        *tick += 1;
        Utc::now() + Duration::milliseconds(*tick)
    }
}

#[async_trait]
impl TitleDirectory for InMemoryReviewStore {
    async fn exists(&self, title_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.titles.lock().unwrap().contains(&title_id))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewStore {
    async fn list_for_title(&self, title_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let mut found: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.title_id == title_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(found)
    }

    async fn find_in_title(&self, title_id: Uuid, id: Uuid) -> Result<Option<Review>, StoreError> {
        Ok(self.review(id).filter(|r| r.title_id == title_id))
    }

    async fn author_has_review(
        &self,
        title_id: Uuid,
        author_id: UserId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.title_id == title_id && r.author_id == author_id))
    }

    async fn create(
        &self,
        title_id: Uuid,
        author_id: UserId,
        draft: ReviewDraft,
    ) -> Result<Review, StoreError> {
        if self.author_has_review(title_id, author_id).await? {
            return Err(StoreError::Duplicate);
        }
        let review = Review {
            id: Uuid::new_v4(),
            title_id,
            author_id,
            author: self.author_name(author_id),
            text: draft.text,
            score: draft.score.value(),
            pub_date: self.next_timestamp(),
        };
        self.reviews.lock().unwrap().push(review.clone());
        Ok(review)
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(text) = changes.text {
            review.text = text;
        }
        if let Some(score) = changes.score {
            review.score = score.value();
        }
        Ok(review.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        if reviews.len() == before {
            return Err(StoreError::NotFound);
        }
        self.comments.lock().unwrap().retain(|c| c.review_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryReviewStore {
    async fn list_for_review(&self, review_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let mut found: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.review_id == review_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(found)
    }

    async fn find_in_review(
        &self,
        review_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Comment>, StoreError> {
        Ok(self.comment(id).filter(|c| c.review_id == review_id))
    }

    async fn create(
        &self,
        review_id: Uuid,
        author_id: UserId,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError> {
        let comment = Comment {
            id: Uuid::new_v4(),
            review_id,
            author_id,
            author: self.author_name(author_id),
            text: draft.text,
            pub_date: self.next_timestamp(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn update_text(&self, id: Uuid, text: String) -> Result<Comment, StoreError> {
        let mut comments = self.comments.lock().unwrap();
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        comment.text = text;
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
