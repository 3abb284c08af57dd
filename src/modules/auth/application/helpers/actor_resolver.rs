use std::sync::Arc;

use crate::auth::application::domain::entities::{Actor, UserId};
use crate::auth::application::ports::outgoing::{TokenError, TokenProvider, UserQuery};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveActorError {
    #[error("Invalid token: {0}")]
    InvalidToken(TokenError),

    #[error("Token subject no longer exists")]
    UnknownUser,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Turns a bearer token into the current [`Actor`].
///
/// The role is read from the store on every call, so a role change applies to
/// tokens that were issued before it.
#[derive(Clone)]
pub struct ActorResolver {
    token_provider: Arc<dyn TokenProvider>,
    user_query: Arc<dyn UserQuery>,
}

impl ActorResolver {
    pub fn new(token_provider: Arc<dyn TokenProvider>, user_query: Arc<dyn UserQuery>) -> Self {
        Self {
            token_provider,
            user_query,
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<Actor, ResolveActorError> {
        let claims = self
            .token_provider
            .verify_access_token(token)
            .map_err(ResolveActorError::InvalidToken)?;

        let user = self
            .user_query
            .find_by_id(UserId::from(claims.sub))
            .await
            .map_err(|e| ResolveActorError::RepositoryError(e.to_string()))?
            .ok_or(ResolveActorError::UnknownUser)?;

        Ok(Actor::from(&user))
    }
}
