use crate::auth::application::domain::entities::User;
use crate::auth::application::ports::outgoing::TokenProvider;

use super::stubs::StubTokenProvider;

/// `Authorization` header value accepted by apps built with `TestAppStateBuilder`.
pub fn bearer_for(user: &User) -> String {
    let token = StubTokenProvider
        .generate_access_token(user.id, &user.username)
        .expect("stub tokens never fail");
    format!("Bearer {token}")
}
