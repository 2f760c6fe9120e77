use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::Category;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("unsupported question amount: {0} (expected one of 5, 10, 15, 20)")]
    InvalidAmount(u32),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Value sent as the `difficulty` query parameter.
    #[must_use]
    pub fn as_api_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Capitalized label for menus.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_api_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SelectionError::UnknownDifficulty(s.to_owned()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── AMOUNT ────────────────────────────────────────────────────────────────────
//

/// Number of questions requested per session: one of 5, 10, 15 or 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct QuestionAmount(u32);

impl QuestionAmount {
    pub const ALLOWED: [u32; 4] = [5, 10, 15, 20];

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for QuestionAmount {
    fn default() -> Self {
        Self(10)
    }
}

impl TryFrom<u32> for QuestionAmount {
    type Error = SelectionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(SelectionError::InvalidAmount(value))
        }
    }
}

impl From<QuestionAmount> for u32 {
    fn from(amount: QuestionAmount) -> Self {
        amount.0
    }
}

impl FromStr for QuestionAmount {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| SelectionError::InvalidAmount(0))?;
        Self::try_from(value)
    }
}

impl fmt::Display for QuestionAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Options chosen before a session starts. Fixed for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSelection {
    difficulty: Difficulty,
    amount: QuestionAmount,
    category: Category,
}

impl SessionSelection {
    #[must_use]
    pub fn new(difficulty: Difficulty, amount: QuestionAmount, category: Category) -> Self {
        Self {
            difficulty,
            amount,
            category,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn amount(&self) -> QuestionAmount {
        self.amount
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryId;

    #[test]
    fn difficulty_parses_menu_and_api_spellings() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "extreme".parse::<Difficulty>(),
            Err(SelectionError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn amount_accepts_only_menu_values() {
        assert_eq!(QuestionAmount::try_from(15).unwrap().value(), 15);
        assert_eq!(
            QuestionAmount::try_from(7).unwrap_err(),
            SelectionError::InvalidAmount(7)
        );
        assert_eq!(QuestionAmount::default().value(), 10);
    }

    #[test]
    fn amount_deserialization_is_validated() {
        assert!(serde_json::from_str::<QuestionAmount>("20").is_ok());
        assert!(serde_json::from_str::<QuestionAmount>("3").is_err());
    }

    #[test]
    fn default_selection_matches_start_screen() {
        let selection = SessionSelection::default();
        assert_eq!(selection.difficulty(), Difficulty::Easy);
        assert_eq!(selection.amount().value(), 10);
        assert_eq!(selection.category().id(), CategoryId::new(9));
        assert_eq!(selection.category().name(), "General Knowledge");
    }
}
