use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::ports::incoming::use_cases::{ObtainTokenCommand, ObtainTokenError};
use crate::shared::api::{ApiResponse, FieldErrors};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ObtainTokenRequest {
    #[schema(example = "johndoe")]
    pub username: Option<String>,

    #[schema(example = "X7K2P9")]
    pub confirmation_code: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

fn map_obtain_token_error(err: ObtainTokenError) -> HttpResponse {
    match err {
        ObtainTokenError::Validation(fields) => {
            ApiResponse::validation_error("VALIDATION_ERROR", fields)
        }
        ObtainTokenError::UserNotFound => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),
        ObtainTokenError::InvalidCode => {
            warn!("Token requested with an invalid confirmation code");
            ApiResponse::validation_error(
                "INVALID_CONFIRMATION_CODE",
                FieldErrors::single("confirmation_code", "Invalid confirmation code."),
            )
        }
        ObtainTokenError::TokenError(e) => {
            error!(error = %e, "Failed to sign access token");
            ApiResponse::internal_error()
        }
        ObtainTokenError::RepositoryError(e) => {
            error!(error = %e, "Repository error during token exchange");
            ApiResponse::internal_error()
        }
    }
}

/// Exchange a confirmation code for an access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/token/",
    tag = "auth",
    request_body = ObtainTokenRequest,
    responses(
        (status = 200, description = "Access token issued", body = inline(SuccessResponse<TokenResponse>)),
        (status = 400, description = "Missing fields or wrong code", body = ErrorResponse),
        (status = 404, description = "Unknown username", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[post("/api/v1/auth/token/")]
pub async fn obtain_token_handler(
    req: web::Json<ObtainTokenRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let command = ObtainTokenCommand {
        username: req.username,
        confirmation_code: req.confirmation_code,
    };

    match data.auth.obtain_token.execute(command).await {
        Ok(token) => ApiResponse::success(TokenResponse { token }),
        Err(e) => map_obtain_token_error(e),
    }
}
