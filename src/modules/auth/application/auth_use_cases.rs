use std::sync::Arc;

use crate::auth::application::ports::incoming::use_cases::{
    ManageUsersUseCase, ObtainTokenUseCase, OwnProfileUseCase, SignupUseCase,
};

#[derive(Clone)]
pub struct AuthUseCases {
    pub signup: Arc<dyn SignupUseCase + Send + Sync>,
    pub obtain_token: Arc<dyn ObtainTokenUseCase + Send + Sync>,
    pub manage_users: Arc<dyn ManageUsersUseCase + Send + Sync>,
    pub own_profile: Arc<dyn OwnProfileUseCase + Send + Sync>,
}
