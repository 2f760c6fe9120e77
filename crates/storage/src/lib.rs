#![forbid(unsafe_code)]

pub mod category_catalog;
pub mod question_store;
pub mod repository;
pub mod session_token;
pub mod sqlite;

pub use category_catalog::CategoryCatalog;
pub use question_store::QuestionStore;
pub use repository::{HighScoreRepository, InMemoryRepository, Storage, StorageError};
pub use session_token::SessionTokenHolder;
