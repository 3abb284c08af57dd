pub mod jwt;
pub mod random_code_generator;
pub mod sea_orm_entity;
mod user_mapping;
pub mod user_query_postgres;
pub mod user_repository_postgres;
