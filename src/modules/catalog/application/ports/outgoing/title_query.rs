use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::application::domain::entities::Title;

/// Every set field narrows the result; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    /// Case-insensitive substring of the title name
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait TitleQuery: Send + Sync {
    /// Ordered by name, each title carrying its computed rating.
    async fn list(&self, filter: &TitleFilter) -> Result<Vec<Title>, TitleQueryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Title>, TitleQueryError>;
}
