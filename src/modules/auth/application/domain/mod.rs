pub mod entities;
pub mod identity;
pub mod policies;
