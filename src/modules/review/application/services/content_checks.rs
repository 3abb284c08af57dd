use crate::review::application::domain::score::Score;
use crate::shared::api::FieldErrors;

pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const ALREADY_REVIEWED: &str = "You have already reviewed this title.";

/// Trimmed text, or `None` after recording why it was rejected.
/// A missing field only counts as an error when `required` is set.
pub(crate) fn check_text(
    errors: &mut FieldErrors,
    text: Option<String>,
    required: bool,
) -> Option<String> {
    match text {
        None => {
            if required {
                errors.required("text");
            }
            None
        }
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                errors.add("text", BLANK);
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

pub(crate) fn check_score(
    errors: &mut FieldErrors,
    score: Option<i64>,
    required: bool,
) -> Option<Score> {
    match score {
        None => {
            if required {
                errors.required("score");
            }
            None
        }
        Some(value) => Score::new(value)
            .map_err(|e| errors.add("score", e.to_string()))
            .ok(),
    }
}
