pub const CONFIRMATION_CODE_LENGTH: usize = 6;

/// Source of one-time confirmation codes.
pub trait ConfirmationCodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}
