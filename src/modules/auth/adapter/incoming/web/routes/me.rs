use actix_web::{get, patch, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::auth::{require_actor, MaybeActor};
use crate::auth::application::domain::policies::Policy;
use crate::auth::application::ports::incoming::use_cases::{
    OwnProfileError, UpdateOwnProfileCommand, UserProfile,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Editable fields of the caller's own profile. `role` is refused outright.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

fn map_own_profile_error(err: OwnProfileError) -> HttpResponse {
    match err {
        OwnProfileError::Validation(fields) => {
            ApiResponse::validation_error("VALIDATION_ERROR", fields)
        }
        OwnProfileError::NotFound => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),
        OwnProfileError::RepositoryError(e) => {
            error!(error = %e, "Repository error on own profile");
            ApiResponse::internal_error()
        }
    }
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me/",
    tag = "users",
    responses(
        (status = 200, description = "Own profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/v1/users/me/")]
pub async fn get_me_handler(
    req: HttpRequest,
    actor: MaybeActor,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::Authenticated, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match data.auth.own_profile.get(actor.user_id).await {
        Ok(profile) => ApiResponse::success(profile),
        Err(e) => map_own_profile_error(e),
    }
}

/// Update the current user's profile
///
/// Any body that mentions `role` is rejected with 403, whatever its value.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me/",
    tag = "users",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Body tries to change the role", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/v1/users/me/")]
pub async fn patch_me_handler(
    req: HttpRequest,
    actor: MaybeActor,
    body: web::Json<Map<String, Value>>,
    data: web::Data<AppState>,
) -> impl Responder {
    let actor = match require_actor(Policy::Authenticated, &req, &actor) {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    let body = body.into_inner();
    if body.contains_key("role") {
        warn!(user_id = %actor.user_id, "Self-service role change refused");
        return ApiResponse::forbidden(
            "ROLE_CHANGE_FORBIDDEN",
            "Changing your own role is not allowed",
        );
    }

    let update: UpdateMeRequest = match serde_json::from_value(Value::Object(body)) {
        Ok(update) => update,
        Err(e) => return ApiResponse::bad_request("VALIDATION_ERROR", &e.to_string()),
    };

    let command = UpdateOwnProfileCommand {
        username: update.username,
        email: update.email,
        first_name: update.first_name,
        last_name: update.last_name,
        bio: update.bio,
    };

    match data.auth.own_profile.update(actor.user_id, command).await {
        Ok(profile) => ApiResponse::success(profile),
        Err(e) => map_own_profile_error(e),
    }
}
