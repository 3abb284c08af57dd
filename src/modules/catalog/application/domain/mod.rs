pub mod entities;
pub mod naming;
