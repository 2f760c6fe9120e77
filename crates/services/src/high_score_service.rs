use std::sync::Arc;

use storage::repository::{HighScoreRepository, StorageError};
use trivia_core::model::{HighScore, Score};

use crate::Clock;

/// Reads and ratchets the persisted best score.
#[derive(Clone)]
pub struct HighScoreService {
    clock: Clock,
    repo: Arc<dyn HighScoreRepository>,
}

impl HighScoreService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn HighScoreRepository>) -> Self {
        Self { clock, repo }
    }

    /// Best score so far; zero if nothing was ever stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be read.
    pub async fn get(&self) -> Result<Score, StorageError> {
        Ok(self
            .repo
            .get_high_score()
            .await?
            .map_or(Score::ZERO, |record| record.score()))
    }

    /// Full record, including when it was reached.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be read.
    pub async fn record(&self) -> Result<Option<HighScore>, StorageError> {
        self.repo.get_high_score().await
    }

    /// Persist `candidate` only if it beats the stored best. Returns `true` on a new record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be written.
    pub async fn ratchet_update(&self, candidate: Score) -> Result<bool, StorageError> {
        let improved = self
            .repo
            .ratchet_high_score(HighScore::new(candidate, self.clock.now()))
            .await?;
        if improved {
            tracing::info!(score = candidate.value(), "new high score");
        }
        Ok(improved)
    }
}
