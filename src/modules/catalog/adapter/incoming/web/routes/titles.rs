use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::auth::{authorize, MaybeActor};
use crate::auth::application::domain::policies::Policy;
use crate::catalog::application::domain::entities::Title;
use crate::catalog::application::ports::incoming::use_cases::{TitleCommand, TitleError};
use crate::catalog::application::ports::outgoing::TitleFilter;
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TitleListQuery {
    /// Case-insensitive substring of the title name
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
}

impl From<TitleListQuery> for TitleFilter {
    fn from(q: TitleListQuery) -> Self {
        TitleFilter {
            name: q.name,
            year: q.year,
            category: q.category,
            genre: q.genre,
        }
    }
}

/// Create and patch body. Omitted fields are left alone on patch;
/// `description` and `category` accept an explicit `null`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct TitleWriteRequest {
    #[schema(example = "Dune")]
    pub name: Option<String>,
    #[schema(example = 1965)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "crate::shared::api::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::shared::api::double_option")]
    #[schema(value_type = Option<String>, example = "books")]
    pub category: Option<Option<String>>,
    /// Genre slugs; replaces the whole set when present
    pub genre: Option<Vec<String>>,
}

impl From<TitleWriteRequest> for TitleCommand {
    fn from(body: TitleWriteRequest) -> Self {
        TitleCommand {
            name: body.name,
            year: body.year,
            description: body.description,
            category: body.category,
            genre: body.genre,
        }
    }
}

fn map_title_error(err: TitleError) -> HttpResponse {
    match err {
        TitleError::Validation(fields) => ApiResponse::validation_error("VALIDATION_ERROR", fields),
        TitleError::NotFound => ApiResponse::not_found("TITLE_NOT_FOUND", "Title not found"),
        TitleError::RepositoryError(e) => {
            error!(error = %e, "Repository error in title route");
            ApiResponse::internal_error()
        }
    }
}

/// List titles
#[utoipa::path(
    get,
    path = "/api/v1/titles/",
    tag = "titles",
    params(TitleListQuery),
    responses(
        (status = 200, description = "Titles ordered by name", body = [Title]),
        (status = 400, description = "Malformed query string", body = ErrorResponse)
    )
)]
#[get("/api/v1/titles/")]
pub async fn list_titles_handler(
    req: HttpRequest,
    actor: MaybeActor,
    query: web::Query<TitleListQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, &req, &actor) {
        return resp;
    }

    match data.catalog.browse_titles.list(query.into_inner().into()).await {
        Ok(titles) => ApiResponse::success(titles),
        Err(e) => map_title_error(e),
    }
}

/// Get a title
#[utoipa::path(
    get,
    path = "/api/v1/titles/{id}/",
    tag = "titles",
    params(("id" = Uuid, Path, description = "Title id")),
    responses(
        (status = 200, description = "Title", body = Title),
        (status = 404, description = "Title not found", body = ErrorResponse)
    )
)]
#[get("/api/v1/titles/{id}/")]
pub async fn get_title_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, &req, &actor) {
        return resp;
    }

    match data.catalog.browse_titles.get(path.into_inner()).await {
        Ok(title) => ApiResponse::success(title),
        Err(e) => map_title_error(e),
    }
}

/// Create a title (admin)
#[utoipa::path(
    post,
    path = "/api/v1/titles/",
    tag = "titles",
    request_body = TitleWriteRequest,
    responses(
        (status = 201, description = "Title created", body = Title),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/v1/titles/")]
pub async fn create_title_handler(
    req: HttpRequest,
    actor: MaybeActor,
    body: web::Json<TitleWriteRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, &req, &actor) {
        return resp;
    }

    match data.catalog.manage_titles.create(body.into_inner().into()).await {
        Ok(title) => ApiResponse::created(title),
        Err(e) => map_title_error(e),
    }
}

/// Partially update a title (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/titles/{id}/",
    tag = "titles",
    params(("id" = Uuid, Path, description = "Title id")),
    request_body = TitleWriteRequest,
    responses(
        (status = 200, description = "Updated title", body = Title),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Title not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/v1/titles/{id}/")]
pub async fn patch_title_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<Uuid>,
    body: web::Json<TitleWriteRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, &req, &actor) {
        return resp;
    }

    match data
        .catalog
        .manage_titles
        .patch(path.into_inner(), body.into_inner().into())
        .await
    {
        Ok(title) => ApiResponse::success(title),
        Err(e) => map_title_error(e),
    }
}

/// Delete a title with its reviews and comments (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/titles/{id}/",
    tag = "titles",
    params(("id" = Uuid, Path, description = "Title id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Title not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/v1/titles/{id}/")]
pub async fn delete_title_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, &req, &actor) {
        return resp;
    }

    match data.catalog.manage_titles.delete(path.into_inner()).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_title_error(e),
    }
}
