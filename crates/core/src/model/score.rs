use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded for each correctly answered question.
pub const CORRECT_ANSWER_AWARD: u32 = 10;

/// Running quiz score. Only ever grows by `CORRECT_ANSWER_AWARD`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn new(points: u32) -> Self {
        Self(points)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the score after one correct answer.
    #[must_use]
    pub fn awarded(self) -> Self {
        Self(self.0.saturating_add(CORRECT_ANSWER_AWARD))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Best score persisted across runs, with the time it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    score: Score,
    achieved_at: DateTime<Utc>,
}

impl HighScore {
    #[must_use]
    pub fn new(score: Score, achieved_at: DateTime<Utc>) -> Self {
        Self { score, achieved_at }
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn achieved_at(&self) -> DateTime<Utc> {
        self.achieved_at
    }

    /// True when `candidate` would replace this record.
    #[must_use]
    pub fn is_beaten_by(&self, candidate: Score) -> bool {
        candidate > self.score
    }
}
