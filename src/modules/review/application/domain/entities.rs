use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::application::domain::entities::UserId;

use super::score::Score;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    /// Id of the reviewed title
    #[serde(rename = "title")]
    pub title_id: Uuid,
    #[serde(skip)]
    pub author_id: UserId,
    /// Username of the author
    pub author: String,
    pub text: String,
    #[schema(minimum = 1, maximum = 10, example = 8)]
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

impl Review {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    /// Id of the review commented on
    #[serde(rename = "review")]
    pub review_id: Uuid,
    #[serde(skip)]
    pub author_id: UserId,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl Comment {
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

/// Validated content of a new review. Parent and author are supplied separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub text: String,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    pub text: Option<String>,
    pub score: Option<Score>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.score.is_none()
    }
}
