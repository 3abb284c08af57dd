use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::auth::application::ports::incoming::use_cases::{SignupCommand, SignupError};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for signup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "johndoe")]
    pub username: Option<String>,

    #[schema(example = "john@example.com")]
    pub email: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SignupResponse {
    #[schema(example = "johndoe")]
    pub username: String,
    #[schema(example = "john@example.com")]
    pub email: String,
}

fn map_signup_error(err: SignupError) -> HttpResponse {
    match err {
        SignupError::Validation(fields) => {
            warn!(fields = %fields, "Signup rejected");
            ApiResponse::validation_error("VALIDATION_ERROR", fields)
        }
        SignupError::EmailDelivery(e) => {
            error!(error = %e, "Confirmation code could not be delivered");
            ApiResponse::bad_gateway(
                "EMAIL_DELIVERY_FAILED",
                "Confirmation code could not be sent",
            )
        }
        SignupError::RepositoryError(e) => {
            error!(error = %e, "Repository error during signup");
            ApiResponse::internal_error()
        }
    }
}

/// Sign up or request a new confirmation code
///
/// Creates the account on first use. Repeating the call with the same
/// username and email mails a fresh code and leaves the account as it is.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup/",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (
            status = 200,
            description = "Confirmation code sent",
            body = inline(SuccessResponse<SignupResponse>),
            example = json!({
                "success": true,
                "data": { "username": "johndoe", "email": "john@example.com" }
            })
        ),
        (
            status = 400,
            description = "Invalid input or username/email mismatch",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "email: Email does not match this username.",
                    "fields": { "email": ["Email does not match this username."] }
                }
            })
        ),
        (status = 502, description = "Email delivery failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[post("/api/v1/auth/signup/")]
pub async fn signup_handler(
    req: web::Json<SignupRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let command = SignupCommand {
        username: req.username,
        email: req.email,
    };

    match data.auth.signup.execute(command).await {
        Ok(result) => ApiResponse::success(SignupResponse {
            username: result.username,
            email: result.email,
        }),
        Err(e) => map_signup_error(e),
    }
}
