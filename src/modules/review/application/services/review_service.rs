use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::Actor;
use crate::auth::application::domain::policies::{Access, Policy, Principal};
use crate::review::application::domain::entities::{Review, ReviewChanges, ReviewDraft};
use crate::review::application::helpers::{
    NestedError, NestedResource, ReviewCollection, TitleLookup,
};
use crate::review::application::ports::incoming::use_cases::{
    ReviewError, ReviewInput, ReviewsUseCase,
};
use crate::review::application::ports::outgoing::{ReviewRepository, StoreError, TitleDirectory};
use crate::shared::api::FieldErrors;

use super::content_checks::{check_score, check_text, ALREADY_REVIEWED};

pub struct ReviewService {
    nested: NestedResource<TitleLookup, ReviewCollection>,
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    pub fn new(titles: Arc<dyn TitleDirectory>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self {
            nested: NestedResource::new(
                TitleLookup::new(titles),
                ReviewCollection::new(reviews.clone()),
            ),
            reviews,
        }
    }

    fn ensure_can_modify(actor: &Actor, review: &Review) -> Result<(), ReviewError> {
        Policy::ReadOpenWriteAuthorOrStaff
            .check_object(
                Access::Write,
                Some(&Principal::from(actor)),
                review.is_authored_by(actor.user_id),
            )
            .map_err(ReviewError::Denied)
    }
}

fn duplicate_review() -> ReviewError {
    ReviewError::Validation(FieldErrors::single("non_field_errors", ALREADY_REVIEWED))
}

fn map_nested_error(err: NestedError) -> ReviewError {
    match err {
        NestedError::ParentNotFound => ReviewError::TitleNotFound,
        NestedError::NotFound => ReviewError::NotFound,
        NestedError::Duplicate => duplicate_review(),
        NestedError::Store(e) => ReviewError::RepositoryError(e),
    }
}

fn map_store_error(err: StoreError) -> ReviewError {
    map_nested_error(err.into())
}

#[async_trait]
impl ReviewsUseCase for ReviewService {
    async fn list(&self, title_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        self.nested.list(title_id).await.map_err(map_nested_error)
    }

    async fn get(&self, title_id: Uuid, id: Uuid) -> Result<Review, ReviewError> {
        self.nested.get(title_id, id).await.map_err(map_nested_error)
    }

    async fn create(
        &self,
        title_id: Uuid,
        actor: &Actor,
        input: ReviewInput,
    ) -> Result<Review, ReviewError> {
        let mut errors = FieldErrors::new();
        let text = check_text(&mut errors, input.text, true);
        let score = check_score(&mut errors, input.score, true);
        let (Some(text), Some(score)) = (text, score) else {
            return Err(ReviewError::Validation(errors));
        };

        // A concurrent insert is still caught by the unique index.
        if self
            .reviews
            .author_has_review(title_id, actor.user_id)
            .await
            .map_err(map_store_error)?
        {
            return Err(duplicate_review());
        }

        let review = self
            .nested
            .create(title_id, actor, ReviewDraft { text, score })
            .await
            .map_err(map_nested_error)?;

        tracing::info!(
            review_id = %review.id,
            title_id = %title_id,
            author = %actor.username,
            score = review.score,
            "Review created"
        );
        Ok(review)
    }

    async fn patch(
        &self,
        title_id: Uuid,
        id: Uuid,
        actor: &Actor,
        input: ReviewInput,
    ) -> Result<Review, ReviewError> {
        let current = self.get(title_id, id).await?;
        Self::ensure_can_modify(actor, &current)?;

        let mut errors = FieldErrors::new();
        let changes = ReviewChanges {
            text: check_text(&mut errors, input.text, false),
            score: check_score(&mut errors, input.score, false),
        };
        errors.into_result().map_err(ReviewError::Validation)?;

        if changes.is_empty() {
            return Ok(current);
        }

        self.reviews
            .update(id, changes)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, title_id: Uuid, id: Uuid, actor: &Actor) -> Result<(), ReviewError> {
        let current = self.get(title_id, id).await?;
        Self::ensure_can_modify(actor, &current)?;

        self.reviews.delete(id).await.map_err(map_store_error)?;

        tracing::info!(review_id = %id, by = %actor.username, "Review deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::entities::UserRole;
    use crate::auth::application::domain::policies::Denial;
    use crate::tests::support::in_memory::{sample_user_with_role, InMemoryUserStore};
    use crate::tests::support::in_memory_reviews::InMemoryReviewStore;

    struct Fixture {
        users: InMemoryUserStore,
        store: InMemoryReviewStore,
        service: ReviewService,
        title_id: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            let users = InMemoryUserStore::default();
            let store = InMemoryReviewStore::new(users.clone());
            let title_id = store.add_title();
            let service = ReviewService::new(Arc::new(store.clone()), Arc::new(store.clone()));
            Self {
                users,
                store,
                service,
                title_id,
            }
        }

        fn actor(&self, username: &str, role: UserRole) -> Actor {
            Actor::from(&self.users.insert(sample_user_with_role(username, role)))
        }
    }

    fn input(text: &str, score: i64) -> ReviewInput {
        ReviewInput {
            text: Some(text.into()),
            score: Some(score),
        }
    }

    #[tokio::test]
    async fn create_attaches_title_and_author() {
        let fx = Fixture::new();
        let reader = fx.actor("reader", UserRole::User);

        let review = fx
            .service
            .create(fx.title_id, &reader, input("Loved it", 9))
            .await
            .unwrap();

        assert_eq!(review.title_id, fx.title_id);
        assert_eq!(review.author, "reader");
        assert_eq!(review.score, 9);
        assert_eq!(fx.store.review_count(), 1);
    }

    #[tokio::test]
    async fn score_outside_range_is_rejected() {
        let fx = Fixture::new();
        let reader = fx.actor("reader", UserRole::User);

        for score in [0, 11] {
            let err = fx
                .service
                .create(fx.title_id, &reader, input("Meh", score))
                .await
                .unwrap_err();
            match err {
                ReviewError::Validation(fields) => assert!(fields.contains("score")),
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(fx.store.review_count(), 0);
    }

    #[tokio::test]
    async fn second_review_by_same_author_is_rejected_but_patch_works() {
        let fx = Fixture::new();
        let reader = fx.actor("reader", UserRole::User);
        let first = fx
            .service
            .create(fx.title_id, &reader, input("Good", 7))
            .await
            .unwrap();

        let err = fx
            .service
            .create(fx.title_id, &reader, input("Still good", 8))
            .await
            .unwrap_err();
        match err {
            ReviewError::Validation(fields) => {
                assert_eq!(
                    fields.get("non_field_errors").unwrap(),
                    [ALREADY_REVIEWED.to_string()]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let patched = fx
            .service
            .patch(
                fx.title_id,
                first.id,
                &reader,
                ReviewInput {
                    score: Some(8),
                    ..ReviewInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.score, 8);
        assert_eq!(patched.text, "Good");
        assert_eq!(fx.store.review_count(), 1);
    }

    #[tokio::test]
    async fn unknown_title_is_reported() {
        let fx = Fixture::new();
        let reader = fx.actor("reader", UserRole::User);

        assert!(matches!(
            fx.service.list(Uuid::new_v4()).await,
            Err(ReviewError::TitleNotFound)
        ));
        assert!(matches!(
            fx.service
                .create(Uuid::new_v4(), &reader, input("Lost", 5))
                .await,
            Err(ReviewError::TitleNotFound)
        ));
    }

    #[tokio::test]
    async fn review_of_another_title_is_not_found() {
        let fx = Fixture::new();
        let other_title = fx.store.add_title();
        let reader = fx.actor("reader", UserRole::User);
        let review = fx
            .service
            .create(fx.title_id, &reader, input("Good", 7))
            .await
            .unwrap();

        assert!(matches!(
            fx.service.get(other_title, review.id).await,
            Err(ReviewError::NotFound)
        ));
    }

    #[tokio::test]
    async fn stranger_cannot_modify_but_staff_can() {
        let fx = Fixture::new();
        let author = fx.actor("author", UserRole::User);
        let stranger = fx.actor("stranger", UserRole::User);
        let moderator = fx.actor("moderator", UserRole::Moderator);
        let review = fx
            .service
            .create(fx.title_id, &author, input("Mine", 6))
            .await
            .unwrap();

        let err = fx
            .service
            .patch(fx.title_id, review.id, &stranger, input("Hijacked", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Denied(Denial::Forbidden)));
        assert!(matches!(
            fx.service.delete(fx.title_id, review.id, &stranger).await,
            Err(ReviewError::Denied(Denial::Forbidden))
        ));

        fx.service
            .delete(fx.title_id, review.id, &moderator)
            .await
            .unwrap();
        assert_eq!(fx.store.review_count(), 0);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let fx = Fixture::new();
        let first = fx.actor("first", UserRole::User);
        let second = fx.actor("second", UserRole::User);
        fx.service
            .create(fx.title_id, &first, input("Early", 5))
            .await
            .unwrap();
        fx.service
            .create(fx.title_id, &second, input("Late", 6))
            .await
            .unwrap();

        let authors: Vec<String> = fx
            .service
            .list(fx.title_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.author)
            .collect();
        assert_eq!(authors, vec!["second", "first"]);
    }
}
