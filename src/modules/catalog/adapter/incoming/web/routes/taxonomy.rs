//! Request handling shared by the category and genre routes.

use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::auth::adapter::incoming::web::extractors::auth::{authorize, MaybeActor};
use crate::auth::application::domain::policies::Policy;
use crate::catalog::application::ports::incoming::use_cases::{
    CreateTaxonCommand, ManageTaxonomyUseCase, TaxonomyError,
};
use crate::shared::api::ApiResponse;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaxonSearchQuery {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateTaxonRequest {
    #[schema(example = "Fantasy")]
    pub name: Option<String>,
    #[schema(example = "fantasy")]
    pub slug: Option<String>,
}

pub(crate) fn map_taxonomy_error(err: TaxonomyError, not_found_code: &str) -> HttpResponse {
    match err {
        TaxonomyError::Validation(fields) => {
            ApiResponse::validation_error("VALIDATION_ERROR", fields)
        }
        TaxonomyError::NotFound => ApiResponse::not_found(not_found_code, "No entry with this slug"),
        TaxonomyError::RepositoryError(e) => {
            error!(error = %e, "Repository error in taxonomy route");
            ApiResponse::internal_error()
        }
    }
}

pub(crate) async fn list_entries(
    use_case: &dyn ManageTaxonomyUseCase,
    req: &HttpRequest,
    actor: &MaybeActor,
    query: TaxonSearchQuery,
    not_found_code: &str,
) -> HttpResponse {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, req, actor) {
        return resp;
    }

    match use_case.list(query.search).await {
        Ok(entries) => ApiResponse::success(entries),
        Err(e) => map_taxonomy_error(e, not_found_code),
    }
}

pub(crate) async fn create_entry(
    use_case: &dyn ManageTaxonomyUseCase,
    req: &HttpRequest,
    actor: &MaybeActor,
    body: CreateTaxonRequest,
    not_found_code: &str,
) -> HttpResponse {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, req, actor) {
        return resp;
    }

    let command = CreateTaxonCommand {
        name: body.name,
        slug: body.slug,
    };
    match use_case.create(command).await {
        Ok(entry) => ApiResponse::created(entry),
        Err(e) => map_taxonomy_error(e, not_found_code),
    }
}

pub(crate) async fn delete_entry(
    use_case: &dyn ManageTaxonomyUseCase,
    req: &HttpRequest,
    actor: &MaybeActor,
    slug: &str,
    not_found_code: &str,
) -> HttpResponse {
    if let Err(resp) = authorize(Policy::ReadOpenWriteAdmin, req, actor) {
        return resp;
    }

    match use_case.delete(slug).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_taxonomy_error(e, not_found_code),
    }
}
