use std::fmt;

use crate::model::{Question, Score};

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    NotStarted,
    Loading,
    InProgress,
    Paused,
    GameOver,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizPhase::NotStarted => "not started",
            QuizPhase::Loading => "loading",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Paused => "paused",
            QuizPhase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of the quiz, published after every transition.
///
/// Transitions never mutate a snapshot; each helper below returns the next
/// value. `is_game_over` and `is_game_paused` are derived from a single
/// `phase`, so they can never both be true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizUiState {
    phase: QuizPhase,
    current_question: Option<Question>,
    score: Score,
    index: u32,
    total: u32,
    is_correct_choice: bool,
}

impl Default for QuizUiState {
    fn default() -> Self {
        Self::not_started()
    }
}

impl QuizUiState {
    #[must_use]
    pub fn not_started() -> Self {
        Self {
            phase: QuizPhase::NotStarted,
            current_question: None,
            score: Score::ZERO,
            index: 1,
            total: 0,
            is_correct_choice: false,
        }
    }

    /// First snapshot of a running session: index 1, score 0.
    #[must_use]
    pub fn seeded(first: Question, total: u32) -> Self {
        Self {
            phase: QuizPhase::InProgress,
            current_question: Some(first),
            score: Score::ZERO,
            index: 1,
            total,
            is_correct_choice: false,
        }
    }

    /// Moves to `next` after an answer to the current question.
    #[must_use]
    pub fn advanced(&self, next: Question, was_correct: bool) -> Self {
        Self {
            phase: QuizPhase::InProgress,
            current_question: Some(next),
            score: self.scored(was_correct),
            index: self.index.saturating_add(1).min(self.total),
            total: self.total,
            is_correct_choice: was_correct,
        }
    }

    /// Ends the game after the last question was answered.
    #[must_use]
    pub fn finished(&self, was_correct: bool) -> Self {
        Self {
            phase: QuizPhase::GameOver,
            score: self.scored(was_correct),
            is_correct_choice: was_correct,
            ..self.clone()
        }
    }

    /// Ends the game early, keeping the score reached so far.
    #[must_use]
    pub fn exited(&self) -> Self {
        Self {
            phase: QuizPhase::GameOver,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn paused(&self) -> Self {
        Self {
            phase: QuizPhase::Paused,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn resumed(&self) -> Self {
        Self {
            phase: QuizPhase::InProgress,
            ..self.clone()
        }
    }

    fn scored(&self, was_correct: bool) -> Score {
        if was_correct {
            self.score.awarded()
        } else {
            self.score
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    /// 1-based position of the displayed question.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn is_correct_choice(&self) -> bool {
        self.is_correct_choice
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == QuizPhase::GameOver
    }

    #[must_use]
    pub fn is_game_paused(&self) -> bool {
        self.phase == QuizPhase::Paused
    }

    /// True while the displayed question is the final one.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index >= self.total
    }
}
