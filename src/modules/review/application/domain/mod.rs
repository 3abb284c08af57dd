pub mod entities;
pub mod score;
