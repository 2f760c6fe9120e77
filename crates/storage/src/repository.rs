use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use trivia_core::model::HighScore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable best-score persistence.
#[async_trait]
pub trait HighScoreRepository: Send + Sync {
    /// Fetch the stored best score, if one was ever written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_high_score(&self) -> Result<Option<HighScore>, StorageError>;

    /// Store `candidate` only if it beats the stored score (a missing record counts as zero).
    ///
    /// Returns `true` when the record was written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn ratchet_high_score(&self, candidate: HighScore) -> Result<bool, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    high_score: Arc<Mutex<Option<HighScore>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HighScoreRepository for InMemoryRepository {
    async fn get_high_score(&self) -> Result<Option<HighScore>, StorageError> {
        let guard = self
            .high_score
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn ratchet_high_score(&self, candidate: HighScore) -> Result<bool, StorageError> {
        let mut guard = self
            .high_score
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let beats = match guard.as_ref() {
            Some(stored) => stored.is_beaten_by(candidate.score()),
            None => candidate.score().value() > 0,
        };
        if beats {
            *guard = Some(candidate);
        }
        Ok(beats)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub high_scores: Arc<dyn HighScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let high_scores: Arc<dyn HighScoreRepository> = Arc::new(repo);
        Self { high_scores }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_core::model::Score;
    use trivia_core::time::fixed_now;

    fn record(points: u32) -> HighScore {
        HighScore::new(Score::new(points), fixed_now())
    }

    #[tokio::test]
    async fn empty_repository_has_no_record() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_high_score().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ratchet_keeps_the_maximum() {
        let repo = InMemoryRepository::new();

        assert!(repo.ratchet_high_score(record(30)).await.unwrap());
        assert!(!repo.ratchet_high_score(record(20)).await.unwrap());
        assert!(!repo.ratchet_high_score(record(30)).await.unwrap());
        assert!(repo.ratchet_high_score(record(50)).await.unwrap());

        let stored = repo.get_high_score().await.unwrap().unwrap();
        assert_eq!(stored.score().value(), 50);
    }

    #[tokio::test]
    async fn zero_never_creates_a_record() {
        let repo = InMemoryRepository::new();
        assert!(!repo.ratchet_high_score(record(0)).await.unwrap());
        assert!(repo.get_high_score().await.unwrap().is_none());
    }
}
