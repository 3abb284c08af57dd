use crate::auth::application::domain::entities::UserRole;
use crate::auth::application::domain::identity::{validate_person_name, Email, Username};
use crate::auth::application::ports::outgoing::{UniqueField, UpdateUserData};
use crate::shared::api::FieldErrors;

pub(crate) use crate::shared::api::REQUIRED;

/// Collects per-field failures while parsing user input.
pub(crate) fn check_username(raw: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.add("username", REQUIRED);
            None
        }
        Some(value) => match Username::parse(value) {
            Ok(username) => Some(username.into_inner()),
            Err(e) => {
                errors.add("username", e.to_string());
                None
            }
        },
    }
}

pub(crate) fn check_email(raw: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.add("email", REQUIRED);
            None
        }
        Some(value) => match Email::parse(value) {
            Ok(email) => Some(email.into_inner()),
            Err(e) => {
                errors.add("email", e.to_string());
                None
            }
        },
    }
}

pub(crate) fn check_name(field: &str, raw: &str, errors: &mut FieldErrors) -> Option<String> {
    match validate_person_name(raw) {
        Ok(name) => Some(name),
        Err(msg) => {
            errors.add(field, msg);
            None
        }
    }
}

pub(crate) fn check_role(raw: &str, errors: &mut FieldErrors) -> Option<UserRole> {
    match raw.trim().parse::<UserRole>() {
        Ok(role) => Some(role),
        Err(_) => {
            errors.add("role", format!("\"{}\" is not a valid choice.", raw.trim()));
            None
        }
    }
}

/// Profile fields shared by the admin patch and the self-service patch.
pub(crate) struct ProfilePatch<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub bio: Option<&'a str>,
}

pub(crate) fn build_profile_update(
    patch: ProfilePatch<'_>,
    errors: &mut FieldErrors,
) -> UpdateUserData {
    UpdateUserData {
        username: patch.username.and_then(|u| check_username(Some(u), errors)),
        email: patch.email.and_then(|e| check_email(Some(e), errors)),
        first_name: patch
            .first_name
            .and_then(|n| check_name("first_name", n, errors)),
        last_name: patch
            .last_name
            .and_then(|n| check_name("last_name", n, errors)),
        bio: patch.bio.map(|b| b.to_string()),
        role: None,
    }
}

pub(crate) fn duplicate(field: UniqueField) -> FieldErrors {
    match field {
        UniqueField::Email => FieldErrors::single("email", "A user with that email already exists."),
        UniqueField::Username | UniqueField::Unknown => {
            FieldErrors::single("username", "A user with that username already exists.")
        }
    }
}
