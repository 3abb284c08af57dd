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
use crate::review::application::domain::entities::Comment;
use crate::review::application::ports::incoming::use_cases::{
    CommentError, CommentInput, ReviewKey,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Agreed, the ending is worth it.")]
    pub text: Option<String>,
}

fn review_key((title_id, review_id): (Uuid, Uuid)) -> ReviewKey {
    ReviewKey {
        title_id,
        review_id,
    }
}

fn map_comment_error(err: CommentError) -> HttpResponse {
    match err {
        CommentError::Validation(fields) => {
            ApiResponse::validation_error("VALIDATION_ERROR", fields)
        }
        CommentError::ReviewNotFound => {
            ApiResponse::not_found("REVIEW_NOT_FOUND", "Review not found")
        }
        CommentError::NotFound => ApiResponse::not_found("COMMENT_NOT_FOUND", "Comment not found"),
        CommentError::Denied(denial) => denial_response(denial),
        CommentError::RepositoryError(e) => {
            error!(error = %e, "Repository error in comment route");
            ApiResponse::internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/",
    tag = "comments",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = [Comment]),
        (status = 404, description = "Review not found under this title", body = ErrorResponse)
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/{review_id}/comments/")]
pub async fn list_comments_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        return resp;
    }

    match data.review.comments.list(review_key(path.into_inner())).await {
        Ok(comments) => ApiResponse::success(comments),
        Err(e) => map_comment_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/",
    tag = "comments",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Blank text", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Review not found under this title", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/v1/titles/{title_id}/reviews/{review_id}/comments/")]
pub async fn create_comment_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let input = CommentInput {
        text: body.into_inner().text,
    };
    match data
        .review
        .comments
        .create(review_key(path.into_inner()), actor, input)
        .await
    {
        Ok(comment) => ApiResponse::created(comment),
        Err(e) => map_comment_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    tag = "comments",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/")]
pub async fn get_comment_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        return resp;
    }

    let (title_id, review_id, comment_id) = path.into_inner();
    match data
        .review
        .comments
        .get(review_key((title_id, review_id)), comment_id)
        .await
    {
        Ok(comment) => ApiResponse::success(comment),
        Err(e) => map_comment_error(e),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    tag = "comments",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = Comment),
        (status = 403, description = "Not the author or staff", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/")]
pub async fn patch_comment_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let (title_id, review_id, comment_id) = path.into_inner();
    let input = CommentInput {
        text: body.into_inner().text,
    };
    match data
        .review
        .comments
        .patch(review_key((title_id, review_id)), comment_id, actor, input)
        .await
    {
        Ok(comment) => ApiResponse::success(comment),
        Err(e) => map_comment_error(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    tag = "comments",
    params(
        ("title_id" = Uuid, Path, description = "Title id"),
        ("review_id" = Uuid, Path, description = "Review id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the author or staff", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/")]
pub async fn delete_comment_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::ReadOpenWriteAuthorOrStaff, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let (title_id, review_id, comment_id) = path.into_inner();
    match data
        .review
        .comments
        .delete(review_key((title_id, review_id)), comment_id, actor)
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_comment_error(e),
    }
}
