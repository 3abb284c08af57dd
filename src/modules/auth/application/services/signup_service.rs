use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::incoming::use_cases::{
    SignupCommand, SignupError, SignupResult, SignupUseCase,
};
use crate::auth::application::ports::outgoing::{
    CreateUserData, UserQuery, UserRepository, UserRepositoryError,
};
use crate::shared::api::FieldErrors;

use super::confirmation_code_issuer::{ConfirmationCodeIssuer, IssueCodeError};
use super::field_checks::{check_email, check_username, duplicate};

/// Signup retries its lookups once when a concurrent request wins the insert.
const MAX_ATTEMPTS: usize = 2;

enum Lookup {
    Settled(Result<SignupResult, SignupError>),
    Vacant,
}

pub struct SignupService {
    user_query: Arc<dyn UserQuery>,
    user_repository: Arc<dyn UserRepository>,
    issuer: ConfirmationCodeIssuer,
}

impl SignupService {
    pub fn new(
        user_query: Arc<dyn UserQuery>,
        user_repository: Arc<dyn UserRepository>,
        issuer: ConfirmationCodeIssuer,
    ) -> Self {
        Self {
            user_query,
            user_repository,
            issuer,
        }
    }

    /// Resolves the request against existing accounts, if any match.
    async fn lookup(&self, username: &str, email: &str) -> Result<Lookup, SignupError> {
        if !username.is_empty() {
            if let Some(user) = self
                .user_query
                .find_by_username(username)
                .await
                .map_err(|e| SignupError::RepositoryError(e.to_string()))?
            {
                if user.email != email {
                    return Ok(Lookup::Settled(Err(SignupError::Validation(
                        FieldErrors::single("email", "Email does not match this username."),
                    ))));
                }
                let outcome = self.issue(&user).await.map(|_| SignupResult {
                    username: user.username.clone(),
                    email: user.email.clone(),
                });
                return Ok(Lookup::Settled(outcome));
            }
        }

        if !email.is_empty()
            && self
                .user_query
                .find_by_email(email)
                .await
                .map_err(|e| SignupError::RepositoryError(e.to_string()))?
                .is_some()
        {
            return Ok(Lookup::Settled(Err(SignupError::Validation(
                FieldErrors::single("username", "Username does not match this email."),
            ))));
        }

        Ok(Lookup::Vacant)
    }

    async fn issue(&self, user: &User) -> Result<(), SignupError> {
        self.issuer.issue(user).await.map(|_| ()).map_err(|e| match e {
            IssueCodeError::Delivery(msg) => SignupError::EmailDelivery(msg),
            IssueCodeError::Repository(msg) => SignupError::RepositoryError(msg),
        })
    }
}

#[async_trait]
impl SignupUseCase for SignupService {
    async fn execute(&self, command: SignupCommand) -> Result<SignupResult, SignupError> {
        let raw_username = command.username.as_deref().map(str::trim).unwrap_or("");
        let raw_email = command.email.as_deref().map(str::trim).unwrap_or("");

        for attempt in 1..=MAX_ATTEMPTS {
            if let Lookup::Settled(outcome) = self.lookup(raw_username, raw_email).await? {
                return outcome;
            }

            let mut errors = FieldErrors::new();
            let username = check_username(command.username.as_deref(), &mut errors);
            let email = check_email(command.email.as_deref(), &mut errors);
            let (Some(username), Some(email)) = (username, email) else {
                return Err(SignupError::Validation(errors));
            };

            match self
                .user_repository
                .create_user(CreateUserData::signup(username, email))
                .await
            {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
                    self.issue(&user).await?;
                    return Ok(SignupResult {
                        username: user.username,
                        email: user.email,
                    });
                }
                Err(UserRepositoryError::UserAlreadyExists(field)) => {
                    if attempt == MAX_ATTEMPTS {
                        return Err(SignupError::Validation(duplicate(field)));
                    }
                    tracing::debug!(?field, "Concurrent signup detected, re-checking accounts");
                }
                Err(e) => return Err(SignupError::RepositoryError(e.to_string())),
            }
        }

        Err(SignupError::RepositoryError("signup did not settle".to_string()))
    }
}
