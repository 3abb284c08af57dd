pub use sea_orm_migration::prelude::*;

mod m20250304_000001_create_users_table;
mod m20250304_000002_create_categories_table;
mod m20250304_000003_create_genres_table;
mod m20250304_000004_create_titles_table;
mod m20250304_000005_create_title_genres_table;
mod m20250304_000006_create_reviews_table;
mod m20250304_000007_create_comments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250304_000001_create_users_table::Migration),
            Box::new(m20250304_000002_create_categories_table::Migration),
            Box::new(m20250304_000003_create_genres_table::Migration),
            Box::new(m20250304_000004_create_titles_table::Migration),
            Box::new(m20250304_000005_create_title_genres_table::Migration),
            Box::new(m20250304_000006_create_reviews_table::Migration),
            Box::new(m20250304_000007_create_comments_table::Migration),
        ]
    }
}
