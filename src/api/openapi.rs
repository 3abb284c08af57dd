use crate::api::schemas::{ErrorDetail, ErrorResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

// Auth & users
use crate::auth::adapter::incoming::web::routes::{
    ObtainTokenRequest, SignupRequest, SignupResponse, TokenResponse, UpdateMeRequest,
    UserWriteRequest,
};
use crate::auth::application::ports::incoming::use_cases::UserProfile;

// Catalog
use crate::catalog::adapter::incoming::web::routes::{CreateTaxonRequest, TitleWriteRequest};
use crate::catalog::application::domain::entities::{TaxonRef, Title};

// Reviews
use crate::review::adapter::incoming::web::routes::{CommentRequest, ReviewRequest};
use crate::review::application::domain::entities::{Comment, Review};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Review Hub API",
        version = "1.0.0",
        description = "Titles, categories, genres, user reviews and comments",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::auth::adapter::incoming::web::routes::signup::signup_handler,
        crate::auth::adapter::incoming::web::routes::obtain_token::obtain_token_handler,

        // User endpoints
        crate::auth::adapter::incoming::web::routes::me::get_me_handler,
        crate::auth::adapter::incoming::web::routes::me::patch_me_handler,
        crate::auth::adapter::incoming::web::routes::users::list_users_handler,
        crate::auth::adapter::incoming::web::routes::users::create_user_handler,
        crate::auth::adapter::incoming::web::routes::users::get_user_handler,
        crate::auth::adapter::incoming::web::routes::users::patch_user_handler,
        crate::auth::adapter::incoming::web::routes::users::delete_user_handler,

        // Category & genre endpoints
        crate::catalog::adapter::incoming::web::routes::categories::list_categories_handler,
        crate::catalog::adapter::incoming::web::routes::categories::create_category_handler,
        crate::catalog::adapter::incoming::web::routes::categories::delete_category_handler,
        crate::catalog::adapter::incoming::web::routes::genres::list_genres_handler,
        crate::catalog::adapter::incoming::web::routes::genres::create_genre_handler,
        crate::catalog::adapter::incoming::web::routes::genres::delete_genre_handler,

        // Title endpoints
        crate::catalog::adapter::incoming::web::routes::titles::list_titles_handler,
        crate::catalog::adapter::incoming::web::routes::titles::create_title_handler,
        crate::catalog::adapter::incoming::web::routes::titles::get_title_handler,
        crate::catalog::adapter::incoming::web::routes::titles::patch_title_handler,
        crate::catalog::adapter::incoming::web::routes::titles::delete_title_handler,

        // Review endpoints
        crate::review::adapter::incoming::web::routes::reviews::list_reviews_handler,
        crate::review::adapter::incoming::web::routes::reviews::create_review_handler,
        crate::review::adapter::incoming::web::routes::reviews::get_review_handler,
        crate::review::adapter::incoming::web::routes::reviews::patch_review_handler,
        crate::review::adapter::incoming::web::routes::reviews::delete_review_handler,

        // Comment endpoints
        crate::review::adapter::incoming::web::routes::comments::list_comments_handler,
        crate::review::adapter::incoming::web::routes::comments::create_comment_handler,
        crate::review::adapter::incoming::web::routes::comments::get_comment_handler,
        crate::review::adapter::incoming::web::routes::comments::patch_comment_handler,
        crate::review::adapter::incoming::web::routes::comments::delete_comment_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            ErrorDetail,

            // Auth DTOs
            SignupRequest,
            SignupResponse,
            ObtainTokenRequest,
            TokenResponse,
            UpdateMeRequest,
            UserWriteRequest,
            UserProfile,

            // Catalog DTOs
            CreateTaxonRequest,
            TaxonRef,
            TitleWriteRequest,
            Title,

            // Review DTOs
            ReviewRequest,
            Review,
            CommentRequest,
            Comment
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and token exchange"),
        (name = "users", description = "User management endpoints"),
        (name = "categories", description = "Title categories"),
        (name = "genres", description = "Title genres"),
        (name = "titles", description = "Reviewable titles"),
        (name = "reviews", description = "Reviews of a title"),
        (name = "comments", description = "Comments on a review"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/token/"))
                        .build(),
                ),
            )
        }
    }
}
