use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// The two flat classifications a title can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Category,
    Genre,
}

impl TaxonomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Genre => "genre",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "Category",
            TaxonomyKind::Genre => "Genre",
        }
    }
}

/// A category or a genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Public face of a [`Taxon`]; ids never leave the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TaxonRef {
    #[schema(example = "Fantasy")]
    pub name: String,
    #[schema(example = "fantasy")]
    pub slug: String,
}

impl From<Taxon> for TaxonRef {
    fn from(taxon: Taxon) -> Self {
        Self {
            name: taxon.name,
            slug: taxon.slug,
        }
    }
}

/// A reviewable work as clients see it.
///
/// `rating` is the integer part of the mean review score and `None` while the
/// title has no reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub category: Option<TaxonRef>,
    #[serde(rename = "genre")]
    pub genres: Vec<TaxonRef>,
}

/// Drops the fractional part of a mean score: 7.9 is reported as 7.
pub fn rating_from_mean(mean: Option<f64>) -> Option<i32> {
    mean.filter(|m| m.is_finite()).map(|m| m.trunc() as i32)
}
