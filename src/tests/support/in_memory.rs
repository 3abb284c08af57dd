//! In-memory port implementations shared by service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::application::domain::entities::{User, UserId, UserRole};
use crate::auth::application::ports::outgoing::{
    ConfirmationCodeGenerator, CreateUserData, UniqueField, UpdateUserData, UserQuery,
    UserQueryError, UserRepository, UserRepositoryError,
};
use crate::email::application::ports::outgoing::{EmailError, EmailSender};

pub fn sample_user(username: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::from(Uuid::new_v4()),
        username: username.to_string(),
        email: email.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        bio: String::new(),
        role: UserRole::User,
        is_superuser: false,
        confirmation_code: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_user_with_role(username: &str, role: UserRole) -> User {
    User {
        role,
        ..sample_user(username, &format!("{username}@example.com"))
    }
}

/* --------------------------------------------------
 * User store
 * -------------------------------------------------- */

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<Vec<User>>>,
    racing_user: Arc<Mutex<Option<User>>>,
}

impl InMemoryUserStore {
    pub fn insert(&self, user: User) -> User {
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn get(&self, username: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn by_id(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// The next `create_user` behaves as if another request inserted `user` first.
    pub fn race_next_create(&self, user: User) {
        *self.racing_user.lock().unwrap() = Some(user);
    }

    fn conflict(users: &[User], username: &str, email: &str, except: Option<UserId>) -> Option<UniqueField> {
        let others = users.iter().filter(|u| Some(u.id) != except);
        for u in others {
            if u.username == username {
                return Some(UniqueField::Username);
            }
            if u.email == email {
                return Some(UniqueField::Email);
            }
        }
        None
    }
}

#[async_trait]
impl UserQuery for InMemoryUserStore {
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, UserQueryError> {
        Ok(self.by_id(user_id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserQueryError> {
        Ok(self.get(username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserQueryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<User>, UserQueryError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| search.map_or(true, |s| u.username.contains(s)))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create_user(&self, data: CreateUserData) -> Result<User, UserRepositoryError> {
        if let Some(racer) = self.racing_user.lock().unwrap().take() {
            let field = if racer.username == data.username {
                UniqueField::Username
            } else {
                UniqueField::Email
            };
            self.users.lock().unwrap().push(racer);
            return Err(UserRepositoryError::UserAlreadyExists(field));
        }

        let mut users = self.users.lock().unwrap();
        if let Some(field) = Self::conflict(&users, &data.username, &data.email, None) {
            return Err(UserRepositoryError::UserAlreadyExists(field));
        }

        let user = User {
            first_name: data.first_name,
            last_name: data.last_name,
            bio: data.bio,
            role: data.role,
            ..sample_user(&data.username, &data.email)
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        user_id: UserId,
        data: UpdateUserData,
    ) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let current = users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(UserRepositoryError::UserNotFound)?;

        let username = data.username.unwrap_or(current.username.clone());
        let email = data.email.unwrap_or(current.email.clone());
        if let Some(field) = Self::conflict(&users, &username, &email, Some(user_id)) {
            return Err(UserRepositoryError::UserAlreadyExists(field));
        }

        let updated = User {
            username,
            email,
            first_name: data.first_name.unwrap_or(current.first_name.clone()),
            last_name: data.last_name.unwrap_or(current.last_name.clone()),
            bio: data.bio.unwrap_or(current.bio.clone()),
            role: data.role.unwrap_or(current.role),
            updated_at: Utc::now(),
            ..current
        };
        if let Some(slot) = users.iter_mut().find(|u| u.id == user_id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn set_confirmation_code(
        &self,
        user_id: UserId,
        code: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(UserRepositoryError::UserNotFound)?;
        user.confirmation_code = code;
        Ok(())
    }

    async fn consume_confirmation_code(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<bool, UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.id == user_id && u.confirmation_code.as_deref() == Some(code))
        {
            Some(user) => {
                user.confirmation_code = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(UserRepositoryError::UserNotFound);
        }
        Ok(())
    }
}

/* --------------------------------------------------
 * Code generator
 * -------------------------------------------------- */

/// Hands out the given codes in order, repeating the last one.
pub struct FixedCodeGenerator {
    codes: Vec<String>,
    next: Mutex<usize>,
}

impl FixedCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            next: Mutex::new(0),
        }
    }
}

impl ConfirmationCodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        let mut next = self.next.lock().unwrap();
        let idx = (*next).min(self.codes.len().saturating_sub(1));
        *next += 1;
        self.codes[idx].clone()
    }
}

/* --------------------------------------------------
 * Email sender
 * -------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    fail: bool,
}

impl RecordingEmailSender {
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::DeliveryFailed("mail relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
