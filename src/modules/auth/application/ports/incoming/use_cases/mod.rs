pub mod manage_users;
pub mod obtain_token;
pub mod own_profile;
pub mod signup;

pub use manage_users::{
    CreateUserCommand, ManageUsersError, ManageUsersUseCase, PatchUserCommand, UserProfile,
};
pub use obtain_token::{ObtainTokenCommand, ObtainTokenError, ObtainTokenUseCase};
pub use own_profile::{OwnProfileError, OwnProfileUseCase, UpdateOwnProfileCommand};
pub use signup::{SignupCommand, SignupError, SignupResult, SignupUseCase};
