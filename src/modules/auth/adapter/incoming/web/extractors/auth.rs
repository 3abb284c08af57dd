use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;

use crate::auth::application::domain::entities::Actor;
use crate::auth::application::domain::policies::{Access, Denial, Policy, Principal};
use crate::auth::application::helpers::ResolveActorError;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// The caller, if the request carried a bearer token.
///
/// A missing header yields `MaybeActor(None)`. A header that is present but
/// invalid is rejected with 401, even on read-only routes.
#[derive(Debug, Clone)]
pub struct MaybeActor(pub Option<Actor>);

impl MaybeActor {
    pub fn actor(&self) -> Option<&Actor> {
        self.0.as_ref()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.0.as_ref().map(Principal::from)
    }
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for MaybeActor {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolver = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.actor_resolver.clone(),
            None => {
                return Box::pin(async { Err(create_api_error(ApiResponse::internal_error())) });
            }
        };

        let token = match extract_token_from_header(req) {
            Ok(Some(token)) => token,
            Ok(None) => return Box::pin(async { Ok(MaybeActor(None)) }),
            Err(response) => return Box::pin(async { Err(create_api_error(response)) }),
        };

        Box::pin(async move {
            match resolver.resolve(&token).await {
                Ok(actor) => Ok(MaybeActor(Some(actor))),
                Err(ResolveActorError::InvalidToken(_)) | Err(ResolveActorError::UnknownUser) => {
                    Err(create_api_error(ApiResponse::unauthorized(
                        "INVALID_TOKEN",
                        "Invalid or expired token",
                    )))
                }
                Err(ResolveActorError::RepositoryError(e)) => {
                    tracing::error!("Repository error resolving actor: {}", e);
                    Err(create_api_error(ApiResponse::internal_error()))
                }
            }
        })
    }
}

/// `Ok(None)` when there is no Authorization header at all.
fn extract_token_from_header(req: &HttpRequest) -> Result<Option<String>, HttpResponse> {
    let Some(header) = req.headers().get("Authorization") else {
        return Ok(None);
    };

    header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(Some)
        .ok_or_else(|| {
            ApiResponse::unauthorized(
                "MISSING_AUTH_HEADER",
                "Missing or invalid authorization header",
            )
        })
}

pub fn denial_response(denial: Denial) -> HttpResponse {
    match denial {
        Denial::Unauthenticated => ApiResponse::unauthorized("NOT_AUTHENTICATED", &denial.to_string()),
        Denial::Forbidden => ApiResponse::forbidden("PERMISSION_DENIED", &denial.to_string()),
    }
}

/// Collection-level check for a handler.
pub fn authorize(policy: Policy, req: &HttpRequest, actor: &MaybeActor) -> Result<(), HttpResponse> {
    let access = Access::for_method(req.method().as_str());
    policy
        .check(access, actor.principal().as_ref())
        .map_err(denial_response)
}

/// Like [`authorize`], but also hands back the actor for routes that require one.
pub fn require_actor<'a>(
    policy: Policy,
    req: &HttpRequest,
    actor: &'a MaybeActor,
) -> Result<&'a Actor, HttpResponse> {
    authorize(policy, req, actor)?;
    actor
        .actor()
        .ok_or_else(|| denial_response(Denial::Unauthenticated))
}
