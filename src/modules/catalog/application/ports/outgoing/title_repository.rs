use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub genre_ids: Vec<Uuid>,
}

/// Partial update. The outer `Option` says whether to touch the column;
/// for nullable columns the inner one is the new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    /// Replaces the whole genre set when present.
    pub genre_ids: Option<Vec<Uuid>>,
}

impl TitleChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleRepositoryError {
    #[error("Title not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Writes touching a title and its genre links run in one transaction.
#[async_trait]
pub trait TitleRepository: Send + Sync {
    async fn create(&self, data: NewTitle) -> Result<Uuid, TitleRepositoryError>;

    async fn update(&self, id: Uuid, changes: TitleChanges) -> Result<(), TitleRepositoryError>;

    /// Removes the title together with its reviews and their comments.
    async fn delete(&self, id: Uuid) -> Result<(), TitleRepositoryError>;
}
