#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The author already has a review on this title.
    #[error("Duplicate review")]
    Duplicate,

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
