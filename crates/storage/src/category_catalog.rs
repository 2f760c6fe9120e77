use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use trivia_core::model::{Category, CategoryId};

/// Selectable categories, shared between the category fetcher and whoever renders the menu.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Arc<RwLock<Vec<Category>>>,
}

impl CategoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog contents. Duplicate ids keep their first occurrence;
    /// the result is ordered by display name.
    ///
    /// Returns the number of categories now held.
    pub fn replace_all(&self, incoming: impl IntoIterator<Item = Category>) -> usize {
        let mut seen = HashSet::new();
        let mut fresh: Vec<Category> = incoming
            .into_iter()
            .filter(|category| seen.insert(category.id()))
            .collect();
        fresh.sort_by(|a, b| a.name().cmp(b.name()));

        let mut guard = self
            .categories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = fresh;
        guard.len()
    }

    #[must_use]
    pub fn list(&self) -> Vec<Category> {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn find(&self, id: CategoryId) -> Option<Category> {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|category| category.id() == id)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: u32, name: &str) -> Category {
        Category::new(CategoryId::new(id), name)
    }

    #[test]
    fn repeated_refresh_does_not_duplicate() {
        let catalog = CategoryCatalog::new();
        let fetched = vec![category(9, "General Knowledge"), category(10, "Books")];

        catalog.replace_all(fetched.clone());
        catalog.replace_all(fetched);

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn dedupes_by_id_and_sorts_by_name() {
        let catalog = CategoryCatalog::new();
        catalog.replace_all(vec![
            category(21, "Sports"),
            category(9, "General Knowledge"),
            category(21, "Sports (again)"),
        ]);

        let names: Vec<_> = catalog.list().iter().map(|c| c.name().to_owned()).collect();
        assert_eq!(names, vec!["General Knowledge", "Sports"]);
        assert_eq!(catalog.find(CategoryId::new(21)).unwrap().name(), "Sports");
        assert!(catalog.find(CategoryId::new(99)).is_none());
    }
}
