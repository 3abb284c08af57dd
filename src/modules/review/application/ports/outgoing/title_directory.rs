use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;

/// Existence check for the titles reviews hang off.
#[async_trait]
pub trait TitleDirectory: Send + Sync {
    async fn exists(&self, title_id: Uuid) -> Result<bool, StoreError>;
}
