use chrono::Utc;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;
use crate::auth::application::ports::outgoing::{TokenClaims, TokenError, TokenProvider};

/// Deterministic, unsigned tokens of the form `stub.<user id>.<username>`.
pub struct StubTokenProvider;

const PREFIX: &str = "stub";

impl TokenProvider for StubTokenProvider {
    fn generate_access_token(
        &self,
        user_id: UserId,
        username: &str,
    ) -> Result<String, TokenError> {
        Ok(format!("{PREFIX}.{user_id}.{username}"))
    }

    fn verify_access_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut parts = token.splitn(3, '.');
        let (Some(PREFIX), Some(id), Some(username)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::MalformedToken);
        };
        let sub = Uuid::parse_str(id).map_err(|_| TokenError::MalformedToken)?;

        let now = Utc::now().timestamp();
        Ok(TokenClaims {
            sub,
            username: username.to_string(),
            iss: "test".to_string(),
            exp: now + 3600,
            iat: now,
            nbf: now,
            token_type: "access".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_subject() {
        let id = UserId::from(Uuid::new_v4());
        let token = StubTokenProvider.generate_access_token(id, "reader").unwrap();

        let claims = StubTokenProvider.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, id.value());
        assert_eq!(claims.username, "reader");
    }

    #[test]
    fn rejects_foreign_tokens() {
        assert_eq!(
            StubTokenProvider.verify_access_token("garbage").unwrap_err(),
            TokenError::MalformedToken
        );
        assert!(StubTokenProvider
            .verify_access_token("stub.not-a-uuid.reader")
            .is_err());
    }
}
