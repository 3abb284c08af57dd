use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::api::schemas::ErrorResponse;
use crate::auth::adapter::incoming::web::extractors::auth::{authorize, MaybeActor};
use crate::auth::application::domain::policies::Policy;
use crate::auth::application::ports::incoming::use_cases::{
    CreateUserCommand, ManageUsersError, PatchUserCommand, UserProfile,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

//
// ──────────────────────────────────────────────────────────
// Request DTOs
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    /// Case-insensitive substring of the username
    pub search: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UserWriteRequest {
    #[schema(example = "johndoe")]
    pub username: Option<String>,
    #[schema(example = "john@example.com")]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[schema(example = "moderator")]
    pub role: Option<String>,
}

impl From<UserWriteRequest> for CreateUserCommand {
    fn from(req: UserWriteRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            role: req.role,
        }
    }
}

impl From<UserWriteRequest> for PatchUserCommand {
    fn from(req: UserWriteRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            role: req.role,
        }
    }
}

pub(crate) fn map_manage_users_error(err: ManageUsersError) -> HttpResponse {
    match err {
        ManageUsersError::Validation(fields) => {
            ApiResponse::validation_error("VALIDATION_ERROR", fields)
        }
        ManageUsersError::NotFound => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),
        ManageUsersError::RepositoryError(e) => {
            error!(error = %e, "Repository error in user administration");
            ApiResponse::internal_error()
        }
    }
}

//
// ──────────────────────────────────────────────────────────
// Handlers
// ──────────────────────────────────────────────────────────
//

/// List users (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users/",
    tag = "users",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Users ordered by username", body = [UserProfile]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/v1/users/")]
pub async fn list_users_handler(
    req: HttpRequest,
    actor: MaybeActor,
    query: web::Query<UserSearchQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::AdminOnly, &req, &actor) {
        return resp;
    }

    match data
        .auth
        .manage_users
        .list(query.into_inner().search)
        .await
    {
        Ok(users) => ApiResponse::success(users),
        Err(e) => map_manage_users_error(e),
    }
}

/// Create a user with any role (admin)
#[utoipa::path(
    post,
    path = "/api/v1/users/",
    tag = "users",
    request_body = UserWriteRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/api/v1/users/")]
pub async fn create_user_handler(
    req: HttpRequest,
    actor: MaybeActor,
    body: web::Json<UserWriteRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::AdminOnly, &req, &actor) {
        return resp;
    }

    match data
        .auth
        .manage_users
        .create(body.into_inner().into())
        .await
    {
        Ok(user) => ApiResponse::created(user),
        Err(e) => map_manage_users_error(e),
    }
}

/// Fetch a user by username (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User", body = UserProfile),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/api/v1/users/{username}/")]
pub async fn get_user_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::AdminOnly, &req, &actor) {
        return resp;
    }

    match data.auth.manage_users.get(&path.into_inner()).await {
        Ok(user) => ApiResponse::success(user),
        Err(e) => map_manage_users_error(e),
    }
}

/// Patch a user, including the role (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{username}/",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    request_body = UserWriteRequest,
    responses(
        (status = 200, description = "Updated user", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/api/v1/users/{username}/")]
pub async fn patch_user_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<String>,
    body: web::Json<UserWriteRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::AdminOnly, &req, &actor) {
        return resp;
    }

    match data
        .auth
        .manage_users
        .patch(&path.into_inner(), body.into_inner().into())
        .await
    {
        Ok(user) => ApiResponse::success(user),
        Err(e) => map_manage_users_error(e),
    }
}

/// Delete a user (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{username}/",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/api/v1/users/{username}/")]
pub async fn delete_user_handler(
    req: HttpRequest,
    actor: MaybeActor,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    if let Err(resp) = authorize(Policy::AdminOnly, &req, &actor) {
        return resp;
    }

    match data.auth.manage_users.delete(&path.into_inner()).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_manage_users_error(e),
    }
}
