pub mod categories;
pub mod genres;
mod taxonomy;
pub mod titles;

pub use categories::{create_category_handler, delete_category_handler, list_categories_handler};
pub use genres::{create_genre_handler, delete_genre_handler, list_genres_handler};
pub use taxonomy::{CreateTaxonRequest, TaxonSearchQuery};
pub use titles::{
    create_title_handler, delete_title_handler, get_title_handler, list_titles_handler,
    patch_title_handler, TitleListQuery, TitleWriteRequest,
};
