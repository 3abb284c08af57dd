//! In-memory catalog ports for title and taxonomy service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::application::domain::entities::{rating_from_mean, Taxon, TaxonRef, Title};
use crate::catalog::application::ports::outgoing::{
    NewTaxon, NewTitle, TaxonomyRepository, TaxonomyRepositoryError, TitleChanges, TitleFilter,
    TitleQuery, TitleQueryError, TitleRepository, TitleRepositoryError,
};

/* --------------------------------------------------
 * Categories / genres
 * -------------------------------------------------- */

#[derive(Clone, Default)]
pub struct InMemoryTaxonomy {
    entries: Arc<Mutex<Vec<Taxon>>>,
}

impl InMemoryTaxonomy {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (name, slug) in entries {
            store.insert(name, slug);
        }
        store
    }

    pub fn insert(&self, name: &str, slug: &str) -> Taxon {
        let taxon = Taxon {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        self.entries.lock().unwrap().push(taxon.clone());
        taxon
    }

    pub fn by_id(&self, id: Uuid) -> Option<Taxon> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn by_slug(&self, slug: &str) -> Option<Taxon> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryTaxonomy {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Taxon>, TaxonomyRepositoryError> {
        let needle = search.map(str::to_lowercase);
        let mut found: Vec<Taxon> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|t| {
                needle
                    .as_deref()
                    .map_or(true, |n| t.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn find_by_slugs(
        &self,
        slugs: &[String],
    ) -> Result<Vec<Taxon>, TaxonomyRepositoryError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|t| slugs.contains(&t.slug))
            .cloned()
            .collect())
    }

    async fn create(&self, data: NewTaxon) -> Result<Taxon, TaxonomyRepositoryError> {
        if self.by_slug(&data.slug).is_some() {
            return Err(TaxonomyRepositoryError::SlugTaken);
        }
        Ok(self.insert(&data.name, &data.slug))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), TaxonomyRepositoryError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|t| t.slug != slug);
        if entries.len() == before {
            return Err(TaxonomyRepositoryError::NotFound);
        }
        Ok(())
    }
}

/* --------------------------------------------------
 * Titles
 * -------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StoredTitle {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub genre_ids: Vec<Uuid>,
}

/// Titles plus the taxonomy stores they point into.
#[derive(Clone, Default)]
pub struct InMemoryTitles {
    pub categories: InMemoryTaxonomy,
    pub genres: InMemoryTaxonomy,
    rows: Arc<Mutex<Vec<StoredTitle>>>,
    scores: Arc<Mutex<HashMap<Uuid, Vec<i32>>>>,
}

impl InMemoryTitles {
    pub fn new(categories: InMemoryTaxonomy, genres: InMemoryTaxonomy) -> Self {
        Self {
            categories,
            genres,
            ..Self::default()
        }
    }

    pub fn insert(&self, name: &str, year: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(StoredTitle {
            id,
            name: name.to_string(),
            year,
            description: None,
            category_id: None,
            genre_ids: vec![],
        });
        id
    }

    pub fn stored(&self, id: Uuid) -> Option<StoredTitle> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn add_score(&self, title_id: Uuid, score: i32) {
        self.scores
            .lock()
            .unwrap()
            .entry(title_id)
            .or_default()
            .push(score);
    }

    fn view(&self, row: &StoredTitle) -> Title {
        let mean = self.scores.lock().unwrap().get(&row.id).and_then(|s| {
            (!s.is_empty()).then(|| s.iter().sum::<i32>() as f64 / s.len() as f64)
        });

        let mut genres: Vec<TaxonRef> = row
            .genre_ids
            .iter()
            .filter_map(|id| self.genres.by_id(*id))
            .map(TaxonRef::from)
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));

        Title {
            id: row.id,
            name: row.name.clone(),
            year: row.year,
            description: row.description.clone(),
            rating: rating_from_mean(mean),
            category: row
                .category_id
                .and_then(|id| self.categories.by_id(id))
                .map(TaxonRef::from),
            genres,
        }
    }
}

#[async_trait]
impl TitleQuery for InMemoryTitles {
    async fn list(&self, filter: &TitleFilter) -> Result<Vec<Title>, TitleQueryError> {
        let rows = self.rows.lock().unwrap().clone();
        let mut titles: Vec<Title> = rows
            .iter()
            .map(|row| self.view(row))
            .filter(|t| {
                filter
                    .name
                    .as_deref()
                    .map_or(true, |n| t.name.to_lowercase().contains(&n.to_lowercase()))
            })
            .filter(|t| filter.year.map_or(true, |y| t.year == y))
            .filter(|t| {
                filter.category.as_deref().map_or(true, |slug| {
                    t.category.as_ref().is_some_and(|c| c.slug == slug)
                })
            })
            .filter(|t| {
                filter
                    .genre
                    .as_deref()
                    .map_or(true, |slug| t.genres.iter().any(|g| g.slug == slug))
            })
            .collect();
        titles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(titles)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Title>, TitleQueryError> {
        Ok(self.stored(id).map(|row| self.view(&row)))
    }
}

#[async_trait]
impl TitleRepository for InMemoryTitles {
    async fn create(&self, data: NewTitle) -> Result<Uuid, TitleRepositoryError> {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(StoredTitle {
            id,
            name: data.name,
            year: data.year,
            description: data.description,
            category_id: data.category_id,
            genre_ids: data.genre_ids,
        });
        Ok(id)
    }

    async fn update(&self, id: Uuid, changes: TitleChanges) -> Result<(), TitleRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TitleRepositoryError::NotFound)?;

        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(year) = changes.year {
            row.year = year;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(category_id) = changes.category_id {
            row.category_id = category_id;
        }
        if let Some(genre_ids) = changes.genre_ids {
            row.genre_ids = genre_ids;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), TitleRepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(TitleRepositoryError::NotFound);
        }
        self.scores.lock().unwrap().remove(&id);
        Ok(())
    }
}
