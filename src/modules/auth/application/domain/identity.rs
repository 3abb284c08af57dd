use email_address::EmailAddress;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 150;

/// Reserved because `/users/me/` addresses the caller's own profile.
const RESERVED_USERNAME: &str = "me";

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username must not exceed {MAX_USERNAME_LENGTH} characters")]
    TooLong,

    #[error("Username contains invalid characters")]
    InvalidCharacters,

    #[error("Username 'me' is reserved")]
    Reserved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        if raw.is_empty() {
            return Err(UsernameError::Empty);
        }
        if raw.chars().count() > MAX_USERNAME_LENGTH {
            return Err(UsernameError::TooLong);
        }
        if raw.eq_ignore_ascii_case(RESERVED_USERNAME) {
            return Err(UsernameError::Reserved);
        }
        if !USERNAME_PATTERN.is_match(raw) {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,

    #[error("Email must not exceed {MAX_EMAIL_LENGTH} characters")]
    TooLong,

    #[error("Invalid email format")]
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !EmailAddress::is_valid(trimmed) {
            return Err(EmailError::Invalid);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Trims and bounds a first or last name.
pub fn validate_person_name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("Must not exceed {MAX_NAME_LENGTH} characters"));
    }
    Ok(trimmed.to_string())
}
