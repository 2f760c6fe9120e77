use std::fmt;

use storage::QuestionStore;
use trivia_core::model::{Question, QuizPhase, QuizUiState};

use crate::error::QuizError;

//
// ─── ACTIONS ───────────────────────────────────────────────────────────────────
//

/// Transition requests understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    Start,
    Seed,
    AbortLoading,
    Answer,
    Pause,
    Resume,
    Exit,
    PlayAgain,
}

impl fmt::Display for QuizAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizAction::Start => "start",
            QuizAction::Seed => "seed questions",
            QuizAction::AbortLoading => "abort loading",
            QuizAction::Answer => "answer",
            QuizAction::Pause => "pause",
            QuizAction::Resume => "resume",
            QuizAction::Exit => "exit",
            QuizAction::PlayAgain => "play again",
        };
        f.write_str(name)
    }
}

/// Result of judging one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub was_correct: bool,
    pub game_over: bool,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Synchronous quiz state machine.
///
/// Owns the question store and the current snapshot. Every transition either
/// replaces the snapshot with a new value or fails with
/// `QuizError::InvalidTransition`, leaving everything as it was.
///
/// `Loading` is tracked beside the snapshot: entering or aborting a load does
/// not produce a new snapshot.
#[derive(Debug)]
pub struct QuizEngine {
    store: QuestionStore,
    state: QuizUiState,
    loading: bool,
    /// 0-based store position of the displayed question.
    position: usize,
}

impl QuizEngine {
    #[must_use]
    pub fn new(store: QuestionStore) -> Self {
        Self {
            store,
            state: QuizUiState::not_started(),
            loading: false,
            position: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.loading {
            QuizPhase::Loading
        } else {
            self.state.phase()
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &QuizUiState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    fn require(&self, allowed: &[QuizPhase], action: QuizAction) -> Result<(), QuizError> {
        let phase = self.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(QuizError::InvalidTransition { phase, action })
        }
    }

    /// `NotStarted → Loading`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `NotStarted`.
    pub fn begin_loading(&mut self) -> Result<(), QuizError> {
        self.require(&[QuizPhase::NotStarted], QuizAction::Start)?;
        self.loading = true;
        Ok(())
    }

    /// `Loading → NotStarted` after a failed fetch. Store and snapshot are untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Loading`.
    pub fn abort_loading(&mut self) -> Result<(), QuizError> {
        self.require(&[QuizPhase::Loading], QuizAction::AbortLoading)?;
        self.loading = false;
        Ok(())
    }

    /// `Loading → InProgress` with the fetched questions.
    ///
    /// An empty list aborts the load instead.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Loading` and
    /// `QuizError::NoQuestions` for an empty list.
    pub fn seed(&mut self, questions: Vec<Question>) -> Result<&QuizUiState, QuizError> {
        self.require(&[QuizPhase::Loading], QuizAction::Seed)?;
        self.loading = false;

        let Some(first) = questions.first().cloned() else {
            return Err(QuizError::NoQuestions);
        };
        self.store.replace(questions);
        self.position = 0;
        self.state = QuizUiState::seeded(first, self.store.total());
        Ok(&self.state)
    }

    /// Judge `answer` against the displayed question and advance.
    ///
    /// Every call while `InProgress` advances, even for the same question; use
    /// [`QuizEngine::answer_at`] to guard against repeated submissions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `InProgress`.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, QuizError> {
        self.require(&[QuizPhase::InProgress], QuizAction::Answer)?;
        let current = self
            .state
            .current_question()
            .ok_or(QuizError::NoQuestions)?;
        let was_correct = current.is_correct(answer);

        if self.state.is_last_question() {
            self.state = self.state.finished(was_correct);
            return Ok(AnswerOutcome {
                was_correct,
                game_over: true,
            });
        }

        let next = self
            .store
            .get(self.position + 1)
            .cloned()
            .ok_or(QuizError::NoQuestions)?;
        self.position += 1;
        self.state = self.state.advanced(next, was_correct);
        Ok(AnswerOutcome {
            was_correct,
            game_over: false,
        })
    }

    /// Like [`QuizEngine::submit_answer`], but only for the question shown at `index` (1-based).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::StaleAnswer` when `index` is not the displayed question,
    /// otherwise the errors of `submit_answer`.
    pub fn answer_at(&mut self, index: u32, answer: &str) -> Result<AnswerOutcome, QuizError> {
        self.require(&[QuizPhase::InProgress], QuizAction::Answer)?;
        let expected = self.state.index();
        if index != expected {
            return Err(QuizError::StaleAnswer {
                expected,
                got: index,
            });
        }
        self.submit_answer(answer)
    }

    /// `InProgress → Paused`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `InProgress`.
    pub fn pause(&mut self) -> Result<&QuizUiState, QuizError> {
        self.require(&[QuizPhase::InProgress], QuizAction::Pause)?;
        self.state = self.state.paused();
        Ok(&self.state)
    }

    /// `Paused → InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Paused`.
    pub fn resume(&mut self) -> Result<&QuizUiState, QuizError> {
        self.require(&[QuizPhase::Paused], QuizAction::Resume)?;
        self.state = self.state.resumed();
        Ok(&self.state)
    }

    /// End the running game early.
    ///
    /// Returns the final `GameOver` snapshot; the engine itself is already back
    /// in `NotStarted` with an empty store when this returns.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `InProgress` and `Paused`.
    pub fn exit(&mut self) -> Result<QuizUiState, QuizError> {
        self.require(&[QuizPhase::InProgress, QuizPhase::Paused], QuizAction::Exit)?;
        let final_state = self.state.exited();
        self.reset();
        Ok(final_state)
    }

    /// `GameOver → NotStarted`: clears the store and resets index and score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `GameOver`.
    pub fn play_again(&mut self) -> Result<&QuizUiState, QuizError> {
        self.require(&[QuizPhase::GameOver], QuizAction::PlayAgain)?;
        self.reset();
        Ok(&self.state)
    }

    fn reset(&mut self) {
        self.store.clear();
        self.position = 0;
        self.loading = false;
        self.state = QuizUiState::not_started();
    }
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new(QuestionStore::new())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
