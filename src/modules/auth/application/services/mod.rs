pub mod confirmation_code_issuer;
mod field_checks;
pub mod manage_users_service;
pub mod obtain_token_service;
pub mod own_profile_service;
pub mod signup_service;

pub use confirmation_code_issuer::{ConfirmationCodeIssuer, IssueCodeError};
pub use manage_users_service::ManageUsersService;
pub use obtain_token_service::ObtainTokenService;
pub use own_profile_service::OwnProfileService;
pub use signup_service::SignupService;
