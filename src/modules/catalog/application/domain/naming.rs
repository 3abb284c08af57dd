use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_SLUG_LENGTH: usize = 50;
pub const MAX_NAME_LENGTH: usize = 256;

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("Slug is required")]
    Empty,

    #[error("Slug must not exceed {MAX_SLUG_LENGTH} characters")]
    TooLong,

    #[error("Slug may contain only letters, numbers, underscores or hyphens")]
    InvalidCharacters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, SlugError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SlugError::Empty);
        }
        if trimmed.chars().count() > MAX_SLUG_LENGTH {
            return Err(SlugError::TooLong);
        }
        if !SLUG_PATTERN.is_match(trimmed) {
            return Err(SlugError::InvalidCharacters);
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

/// Display names for categories, genres and titles.
pub fn validate_display_name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Name must not be blank".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must not exceed {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(trimmed.to_string())
}
