use actix_web::{delete, get, post, web, HttpRequest, Responder};

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::auth::MaybeActor;
use crate::catalog::application::domain::entities::TaxonRef;
use crate::AppState;

use super::taxonomy::{
    create_entry, delete_entry, list_entries, CreateTaxonRequest, TaxonSearchQuery,
};

const NOT_FOUND: &str = "CATEGORY_NOT_FOUND";

/// List categories
#[utoipa::path(
    get,
    path = "/api/v1/categories/",
    tag = "categories",
    params(TaxonSearchQuery),
    responses(
        (status = 200, description = "Categories ordered by name", body = [TaxonRef])
    )
)]
#[get("/api/v1/categories/")]
pub async fn list_categories_handler(
    req: HttpRequest,
    actor: MaybeActor,
    query: web::Query<TaxonSearchQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    list_entries(
        data.catalog.categories.as_ref(),
        &req,
        &actor,
        query.into_inner(),
        NOT_FOUND,
    )
    .await
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "/api/v1/categories/",
    tag = "categories",
    request_body = CreateTaxonRequest,
    responses(
        (status = 201, description = "Category created", body = TaxonRef),
        (status = 400, description = "Invalid or duplicate slug", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/v1/categories/")]
pub async fn create_category_handler(
    req: HttpRequest,
    actor: MaybeActor,
    body: web::Json<CreateTaxonRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    create_entry(
        data.catalog.categories.as_ref(),
        &req,
        &actor,
        body.into_inner(),
        NOT_FOUND,
    )
    .await
}

/// Delete a category (admin). Titles in it become uncategorised.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{slug}/",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such category", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/v1/categories/{slug}/")]
pub async fn delete_category_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    delete_entry(
        data.catalog.categories.as_ref(),
        &req,
        &actor,
        &path.into_inner(),
        NOT_FOUND,
    )
    .await
}
