use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::CategoryId;

/// A selectable trivia category (`id` + display name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The category preselected before the catalog has been fetched.
    #[must_use]
    pub fn general_knowledge() -> Self {
        Self::new(CategoryId::new(9), "General Knowledge")
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::general_knowledge()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
