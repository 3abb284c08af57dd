use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::auth::{
    authorize, denial_response, require_actor, MaybeActor,
};
use crate::auth::application::domain::policies::Policy;
use crate::review::application::domain::entities::Review;
use crate::review::application::ports::incoming::use_cases::{ReviewError, ReviewInput};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Title and author come from the URL and the token; body fields naming them are ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReviewRequest {
    #[schema(example = "A slow start, then impossible to put down.")]
    pub text: Option<String>,
    #[schema(example = 8, minimum = 1, maximum = 10)]
    pub score: Option<i64>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(body: ReviewRequest) -> Self {
        ReviewInput {
            text: body.text,
            score: body.score,
        }
    }
}

fn map_review_error(err: ReviewError) -> HttpResponse {
    match err {
        ReviewError::Validation(fields) => ApiResponse::validation_error("VALIDATION_ERROR", fields),
        ReviewError::TitleNotFound => ApiResponse::not_found("TITLE_NOT_FOUND", "Title not found"),
        ReviewError::NotFound => ApiResponse::not_found("REVIEW_NOT_FOUND", "Review not found"),
        ReviewError::Denied(denial) => denial_response(denial),
        ReviewError::RepositoryError(e) => {
            error!(error = %e, "Repository error in review route");
            ApiResponse::internal_error()
        }
    }
}

/// List reviews of a title, newest first
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/",
    tag = "reviews",
    params(("title_id" = Uuid, Path, description = "Title id")),
    responses(
        (status = 200, description = "Reviews", body = [Review]),
        (status = 404, description = "Title not found", body = ErrorResponse)
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/")]
pub async fn list_reviews_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        return resp;
    }

    match data.review.reviews.list(path.into_inner()).await {
        Ok(reviews) => ApiResponse::success(reviews),
        Err(e) => map_review_error(e),
    }
}

/// Review a title (one review per user and title)
#[utoipa::path(
    post,
    path = "/api/v1/titles/{title_id}/reviews/",
    tag = "reviews",
    params(("title_id" = Uuid, Path, description = "Title id")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid score or text, or already reviewed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Title not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/v1/titles/{title_id}/reviews/")]
pub async fn create_review_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<Uuid>,
    body: web::Json<ReviewRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match data
        .review
        .reviews
        .create(path.into_inner(), actor, body.into_inner().into())
        .await
    {
        Ok(review) => ApiResponse::created(review),
        Err(e) => map_review_error(e),
    }
}

/// Get one review of a title
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/",
    tag = "reviews",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Title or review not found", body = ErrorResponse)
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/{review_id}/")]
pub async fn get_review_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        return resp;
    }

    let (title_id, review_id) = path.into_inner();
    match data.review.reviews.get(title_id, review_id).await {
        Ok(review) => ApiResponse::success(review),
        Err(e) => map_review_error(e),
    }
}

/// Edit a review (author, moderator or admin)
#[utoipa::path(
    patch,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/",
    tag = "reviews",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Updated review", body = Review),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Not the author or staff", body = ErrorResponse),
        (status = 404, description = "Title or review not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/v1/titles/{title_id}/reviews/{review_id}/")]
pub async fn patch_review_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<ReviewRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let (title_id, review_id) = path.into_inner();
    match data
        .review
        .reviews
        .patch(title_id, review_id, actor, body.into_inner().into())
        .await
    {
        Ok(review) => ApiResponse::success(review),
        Err(e) => map_review_error(e),
    }
}

/// Delete a review and its comments (author, moderator or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/",
    tag = "reviews",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the author or staff", body = ErrorResponse),
        (status = 404, description = "Title or review not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/v1/titles/{title_id}/reviews/{review_id}/")]
pub async fn delete_review_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let (title_id, review_id) = path.into_inner();
    match data.review.reviews.delete(title_id, review_id, actor).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_review_error(e),
    }
}
