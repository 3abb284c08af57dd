use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::application::domain::entities::Title;
use crate::catalog::application::ports::outgoing::TitleFilter;
use crate::shared::api::FieldErrors;

//
// ──────────────────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────────────────
//

/// Body of a title create or patch. Category and genres are referenced by slug.
///
/// For `description` and `category` the outer `Option` tells whether the
/// field was sent at all; `Some(None)` means an explicit `null`.
#[derive(Debug, Clone, Default)]
pub struct TitleCommand {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, thiserror::Error)]
pub enum TitleError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Title not found")]
    NotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case traits
// ──────────────────────────────────────────────────────────
//

#[async_trait]
pub trait BrowseTitlesUseCase: Send + Sync {
    async fn list(&self, filter: TitleFilter) -> Result<Vec<Title>, TitleError>;

    async fn get(&self, id: Uuid) -> Result<Title, TitleError>;
}

#[async_trait]
pub trait ManageTitlesUseCase: Send + Sync {
    async fn create(&self, command: TitleCommand) -> Result<Title, TitleError>;

    async fn patch(&self, id: Uuid, command: TitleCommand) -> Result<Title, TitleError>;

    async fn delete(&self, id: Uuid) -> Result<(), TitleError>;
}
