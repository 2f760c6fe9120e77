use std::sync::Arc;

use storage::CategoryCatalog;
use trivia_core::model::{Category, CategoryId};
use trivia_core::text::decode_html_entities;

use crate::api::TriviaApi;
use crate::error::FetchError;

/// Loads the selectable categories into the shared catalog.
#[derive(Clone)]
pub struct CategoryFetcher {
    api: Arc<dyn TriviaApi>,
    catalog: CategoryCatalog,
}

impl CategoryFetcher {
    #[must_use]
    pub fn new(api: Arc<dyn TriviaApi>, catalog: CategoryCatalog) -> Self {
        Self { api, catalog }
    }

    /// Replace the catalog with the server's category list.
    ///
    /// On failure the catalog keeps its previous contents.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails.
    pub async fn refresh(&self) -> Result<usize, FetchError> {
        let envelope = self.api.categories().await.inspect_err(|err| {
            tracing::error!(error = %err, "category fetch failed");
        })?;

        let categories = envelope
            .trivia_categories
            .into_iter()
            .map(|raw| Category::new(CategoryId::new(raw.id), decode_html_entities(&raw.name)));
        let count = self.catalog.replace_all(categories);
        tracing::info!(count, "categories loaded");
        Ok(count)
    }
}
