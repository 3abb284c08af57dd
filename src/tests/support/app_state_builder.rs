use std::sync::Arc;

use actix_web::web;

use crate::auth::application::auth_use_cases::AuthUseCases;
use crate::auth::application::helpers::ActorResolver;
use crate::auth::application::ports::incoming::use_cases::{ObtainTokenUseCase, SignupUseCase};
use crate::auth::application::ports::outgoing::{TokenProvider, UserQuery, UserRepository};
use crate::auth::application::services::{
    ConfirmationCodeIssuer, ManageUsersService, ObtainTokenService, OwnProfileService,
    SignupService,
};
use crate::catalog::application::catalog_use_cases::CatalogUseCases;
use crate::catalog::application::domain::entities::TaxonomyKind;
use crate::catalog::application::services::{
    BrowseTitlesService, ManageTitlesService, TaxonomyService,
};
use crate::review::application::review_use_cases::ReviewUseCases;
use crate::review::application::services::{CommentService, ReviewService};
use crate::AppState;

use super::in_memory::{FixedCodeGenerator, InMemoryUserStore, RecordingEmailSender};
use super::in_memory_catalog::InMemoryTitles;
use super::in_memory_reviews::InMemoryReviewStore;
use super::stubs::StubTokenProvider;

/// Builds an `AppState` whose use cases run on in-memory stores.
///
/// Tokens are issued and checked by [`StubTokenProvider`], so pair it with
/// `auth_helper::bearer_for`. Individual use cases can be swapped for mocks.
#[derive(Default)]
pub struct TestAppStateBuilder {
    users: InMemoryUserStore,
    catalog: InMemoryTitles,
    reviews: Option<InMemoryReviewStore>,
    signup: Option<Arc<dyn SignupUseCase + Send + Sync>>,
    obtain_token: Option<Arc<dyn ObtainTokenUseCase + Send + Sync>>,
}

impl TestAppStateBuilder {
    pub fn with_user_store(mut self, users: InMemoryUserStore) -> Self {
        self.users = users;
        self
    }

    pub fn with_catalog(mut self, catalog: InMemoryTitles) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_reviews(mut self, reviews: InMemoryReviewStore) -> Self {
        self.reviews = Some(reviews);
        self
    }

    pub fn with_signup(mut self, uc: impl SignupUseCase + Send + Sync + 'static) -> Self {
        self.signup = Some(Arc::new(uc));
        self
    }

    pub fn with_obtain_token(
        mut self,
        uc: impl ObtainTokenUseCase + Send + Sync + 'static,
    ) -> Self {
        self.obtain_token = Some(Arc::new(uc));
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        let user_query: Arc<dyn UserQuery> = Arc::new(self.users.clone());
        let user_repository: Arc<dyn UserRepository> = Arc::new(self.users.clone());
        let tokens: Arc<dyn TokenProvider> = Arc::new(StubTokenProvider);

        let signup = self.signup.unwrap_or_else(|| {
            let issuer = ConfirmationCodeIssuer::new(
                user_repository.clone(),
                Arc::new(FixedCodeGenerator::new(&["TEST01"])),
                Arc::new(RecordingEmailSender::default()),
            );
            Arc::new(SignupService::new(
                user_query.clone(),
                user_repository.clone(),
                issuer,
            ))
        });
        let obtain_token = self.obtain_token.unwrap_or_else(|| {
            Arc::new(ObtainTokenService::new(
                user_query.clone(),
                user_repository.clone(),
                tokens.clone(),
                true,
            ))
        });

        let auth = AuthUseCases {
            signup,
            obtain_token,
            manage_users: Arc::new(ManageUsersService::new(
                user_query.clone(),
                user_repository.clone(),
            )),
            own_profile: Arc::new(OwnProfileService::new(
                user_query.clone(),
                user_repository.clone(),
            )),
        };

        let categories = Arc::new(self.catalog.categories.clone());
        let genres = Arc::new(self.catalog.genres.clone());
        let titles = Arc::new(self.catalog.clone());
        let catalog = CatalogUseCases {
            categories: Arc::new(TaxonomyService::new(
                TaxonomyKind::Category,
                categories.clone(),
            )),
            genres: Arc::new(TaxonomyService::new(TaxonomyKind::Genre, genres.clone())),
            browse_titles: Arc::new(BrowseTitlesService::new(titles.clone())),
            manage_titles: Arc::new(ManageTitlesService::new(
                titles.clone(),
                titles,
                categories,
                genres,
            )),
        };

        let reviews = self
            .reviews
            .unwrap_or_else(|| InMemoryReviewStore::new(self.users.clone()));
        let review = ReviewUseCases {
            reviews: Arc::new(ReviewService::new(
                Arc::new(reviews.clone()),
                Arc::new(reviews.clone()),
            )),
            comments: Arc::new(CommentService::new(
                Arc::new(reviews.clone()),
                Arc::new(reviews),
            )),
        };

        web::Data::new(AppState {
            auth,
            catalog,
            review,
            actor_resolver: ActorResolver::new(tokens, user_query),
        })
    }
}
