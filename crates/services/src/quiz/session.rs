use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use storage::QuestionStore;
use trivia_core::model::{QuizPhase, QuizUiState, Score, SessionSelection};

use super::engine::{AnswerOutcome, QuizEngine};
use super::feedback::{AnswerFeedback, FeedbackCue};
use crate::api::ResponseCode;
use crate::error::{FetchError, QuizError};
use crate::fetchers::{QuestionFetcher, TokenFetcher};
use crate::high_score_service::HighScoreService;

/// One player's quiz: wires the engine to the fetchers, the high-score store
/// and the feedback collaborator, and publishes every new snapshot.
///
/// Transitions take `&mut self`, so a caller cannot issue another transition
/// while `start` is waiting on the network.
pub struct QuizSession {
    engine: QuizEngine,
    selection: Option<SessionSelection>,
    questions: QuestionFetcher,
    tokens: TokenFetcher,
    high_scores: HighScoreService,
    feedback: Arc<dyn AnswerFeedback>,
    snapshots: watch::Sender<QuizUiState>,
}

impl QuizSession {
    #[must_use]
    pub fn new(
        questions: QuestionFetcher,
        tokens: TokenFetcher,
        high_scores: HighScoreService,
        feedback: Arc<dyn AnswerFeedback>,
    ) -> Self {
        let engine = QuizEngine::new(QuestionStore::new());
        let (snapshots, _) = watch::channel(engine.snapshot().clone());
        Self {
            engine,
            selection: None,
            questions,
            tokens,
            high_scores,
            feedback,
            snapshots,
        }
    }

    /// Receiver of published snapshots, starting from the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizUiState> {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizUiState {
        self.engine.snapshot().clone()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.engine.phase()
    }

    /// Options of the running session, `None` before start and after reset.
    #[must_use]
    pub fn selection(&self) -> Option<&SessionSelection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &QuestionStore {
        self.engine.store()
    }

    /// Fetch questions for `selection` and begin the game.
    ///
    /// On any failure the session is back in `NotStarted`, the store is as it
    /// was and no snapshot is published. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless `NotStarted`,
    /// `QuizError::Fetch` when the fetch fails and `QuizError::NoQuestions`
    /// when it succeeds without questions.
    pub async fn start(&mut self, selection: SessionSelection) -> Result<QuizUiState, QuizError> {
        self.engine.begin_loading()?;

        if self.tokens.holder().is_empty() {
            if let Err(err) = self.tokens.acquire().await {
                tracing::warn!(error = %err, "continuing without a session token");
            }
        }

        let questions = match self.questions.fetch(&selection).await {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(error = %err, kind = ?err.kind(), "quiz start aborted");
                self.engine.abort_loading()?;
                self.recover_token(&err).await;
                return Err(err.into());
            }
        };

        let state = self.engine.seed(questions)?.clone();
        tracing::info!(
            total = state.total(),
            difficulty = %selection.difficulty(),
            amount = %selection.amount(),
            "quiz started"
        );
        self.selection = Some(selection);
        self.publish(state.clone());
        Ok(state)
    }

    async fn recover_token(&self, err: &FetchError) {
        if let FetchError::Api(ResponseCode::TokenEmpty) = err {
            tracing::warn!("session token exhausted, asking the server to reset it");
            if let Err(reset_err) = self.tokens.reset().await {
                tracing::warn!(error = %reset_err, "session token reset failed");
            }
        }
    }

    /// Judge `answer` for the displayed question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless `InProgress`.
    pub async fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, QuizError> {
        let outcome = self.engine.submit_answer(answer)?;
        self.after_answer(outcome).await;
        Ok(outcome)
    }

    /// Judge `answer` only if question `index` (1-based) is still displayed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::StaleAnswer` for an outdated `index`, otherwise as
    /// [`QuizSession::submit_answer`].
    pub async fn answer_at(&mut self, index: u32, answer: &str) -> Result<AnswerOutcome, QuizError> {
        let outcome = self.engine.answer_at(index, answer)?;
        self.after_answer(outcome).await;
        Ok(outcome)
    }

    async fn after_answer(&mut self, outcome: AnswerOutcome) {
        self.feedback
            .on_answer(FeedbackCue::for_answer(outcome.was_correct));
        let state = self.engine.snapshot().clone();
        tracing::debug!(
            index = state.index(),
            score = state.score().value(),
            correct = outcome.was_correct,
            "answer judged"
        );
        let final_score = state.score();
        self.publish(state);
        if outcome.game_over {
            self.record_final_score(final_score).await;
        }
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless `InProgress`.
    pub fn pause(&mut self) -> Result<QuizUiState, QuizError> {
        let state = self.engine.pause()?.clone();
        self.publish(state.clone());
        Ok(state)
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless `Paused`.
    pub fn resume(&mut self) -> Result<QuizUiState, QuizError> {
        let state = self.engine.resume()?.clone();
        self.publish(state.clone());
        Ok(state)
    }

    /// Quit the running game.
    ///
    /// Publishes the final `GameOver` snapshot, ratchets the high score, then
    /// publishes the reset `NotStarted` snapshot. Returns the final snapshot.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless `InProgress` or `Paused`.
    pub async fn exit(&mut self) -> Result<QuizUiState, QuizError> {
        let final_state = self.engine.exit()?;
        self.publish(final_state.clone());
        self.record_final_score(final_state.score()).await;
        self.selection = None;
        self.publish(self.engine.snapshot().clone());
        Ok(final_state)
    }

    /// Leave the game-over screen for a fresh start.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless `GameOver`.
    pub fn play_again(&mut self) -> Result<QuizUiState, QuizError> {
        let state = self.engine.play_again()?.clone();
        self.selection = None;
        self.publish(state.clone());
        Ok(state)
    }

    async fn record_final_score(&self, score: Score) {
        tracing::info!(score = score.value(), "game over");
        // The game has already ended; a storage failure only loses the record.
        if let Err(err) = self.high_scores.ratchet_update(score).await {
            tracing::error!(error = %err, "failed to persist high score");
        }
    }

    fn publish(&self, state: QuizUiState) {
        self.snapshots.send_replace(state);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.engine.phase())
            .field("index", &self.engine.snapshot().index())
            .field("score", &self.engine.snapshot().score())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use storage::{InMemoryRepository, SessionTokenHolder};
    use trivia_core::model::{Category, Difficulty, QuestionAmount, SessionToken};
    use trivia_core::time::fixed_clock;

    use crate::api::{QuestionsEnvelope, TokenCommand, TriviaApi};
    use crate::testing::{FakeApi, numbered_questions, token_ok};

    #[derive(Default)]
    struct RecordingFeedback {
        cues: Mutex<Vec<FeedbackCue>>,
    }

    impl AnswerFeedback for RecordingFeedback {
        fn on_answer(&self, cue: FeedbackCue) {
            self.cues.lock().unwrap().push(cue);
        }
    }

    struct Harness {
        api: Arc<FakeApi>,
        tokens: SessionTokenHolder,
        high_scores: HighScoreService,
        feedback: Arc<RecordingFeedback>,
        session: QuizSession,
    }

    fn harness() -> Harness {
        let api = Arc::new(FakeApi::default());
        let tokens = SessionTokenHolder::new();
        let high_scores =
            HighScoreService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let feedback = Arc::new(RecordingFeedback::default());
        let dyn_api: Arc<dyn TriviaApi> = api.clone();
        let session = QuizSession::new(
            QuestionFetcher::new(Arc::clone(&dyn_api), tokens.clone()),
            TokenFetcher::new(dyn_api, tokens.clone()),
            high_scores.clone(),
            feedback.clone(),
        );
        Harness {
            api,
            tokens,
            high_scores,
            feedback,
            session,
        }
    }

    fn five_easy_general() -> SessionSelection {
        SessionSelection::new(
            Difficulty::Easy,
            QuestionAmount::try_from(5).unwrap(),
            Category::general_knowledge(),
        )
    }

    #[tokio::test]
    async fn five_correct_answers_end_with_fifty_points() {
        let mut h = harness();
        h.api.push_token(Err(FetchError::Connectivity("offline".into())));
        h.api.push_questions(numbered_questions(5));

        let state = h.session.start(five_easy_general()).await.unwrap();
        assert_eq!(state.index(), 1);
        assert_eq!(h.api.last_query().unwrap().token, "");

        for n in 1..=5 {
            h.session
                .submit_answer(&format!("Answer {n}"))
                .await
                .unwrap();
        }

        let state = h.session.snapshot();
        assert_eq!(state.score().value(), 50);
        assert_eq!(h.session.phase(), QuizPhase::GameOver);
        assert_eq!(h.high_scores.get().await.unwrap().value(), 50);
        assert_eq!(
            h.feedback.cues.lock().unwrap().as_slice(),
            &[FeedbackCue::Correct; 5]
        );
    }

    #[tokio::test]
    async fn server_error_emits_nothing() {
        let mut h = harness();
        h.tokens.set_once(SessionToken::new("tok").unwrap());
        h.api.push_questions(Err(FetchError::RemoteFailure { status: 500 }));
        let mut rx = h.session.subscribe();

        let err = h.session.start(five_easy_general()).await.unwrap_err();

        assert!(matches!(
            err,
            QuizError::Fetch(FetchError::RemoteFailure { status: 500 })
        ));
        assert_eq!(h.session.phase(), QuizPhase::NotStarted);
        assert!(h.session.store().is_empty());
        assert!(!rx.has_changed().unwrap());
        assert!(h.session.selection().is_none());
    }

    #[tokio::test]
    async fn failed_start_can_be_retried_by_caller() {
        let mut h = harness();
        h.tokens.set_once(SessionToken::new("tok").unwrap());
        h.api
            .push_questions(Err(FetchError::Connectivity("offline".into())));
        h.api.push_questions(numbered_questions(2));

        assert!(h.session.start(five_easy_general()).await.is_err());
        let state = h.session.start(five_easy_general()).await.unwrap();
        assert_eq!(state.total(), 2);
    }

    #[tokio::test]
    async fn missing_token_is_acquired_before_fetch() {
        let mut h = harness();
        h.api.push_token(token_ok("fresh"));
        h.api.push_questions(numbered_questions(1));

        h.session.start(five_easy_general()).await.unwrap();

        assert_eq!(h.api.last_query().unwrap().token, "fresh");
    }

    #[tokio::test]
    async fn exhausted_token_is_reset() {
        let mut h = harness();
        h.tokens.set_once(SessionToken::new("old").unwrap());
        h.api.push_questions(Ok(QuestionsEnvelope {
            response_code: 4,
            results: Vec::new(),
        }));
        h.api.push_token(token_ok("old"));

        let err = h.session.start(five_easy_general()).await.unwrap_err();

        assert!(matches!(
            err,
            QuizError::Fetch(FetchError::Api(ResponseCode::TokenEmpty))
        ));
        assert_eq!(
            h.api.token_commands.lock().unwrap().as_slice(),
            &[TokenCommand::Reset(SessionToken::new("old").unwrap())]
        );
        assert_eq!(h.session.phase(), QuizPhase::NotStarted);
    }

    #[tokio::test]
    async fn exit_publishes_game_over_then_reset() {
        let mut h = harness();
        h.tokens.set_once(SessionToken::new("tok").unwrap());
        h.api.push_questions(numbered_questions(3));
        h.session.start(five_easy_general()).await.unwrap();
        h.session.submit_answer("Answer 1").await.unwrap();

        let final_state = h.session.exit().await.unwrap();

        assert!(final_state.is_game_over());
        assert_eq!(final_state.score().value(), 10);
        assert_eq!(h.high_scores.get().await.unwrap().value(), 10);
        assert_eq!(h.session.phase(), QuizPhase::NotStarted);
        assert!(h.session.store().is_empty());
        assert_eq!(h.session.subscribe().borrow().phase(), QuizPhase::NotStarted);
    }

    #[tokio::test]
    async fn invalid_transition_publishes_nothing() {
        let mut h = harness();
        let mut rx = h.session.subscribe();

        assert!(h.session.pause().is_err());
        assert!(h.session.submit_answer("x").await.is_err());
        assert!(h.session.exit().await.is_err());

        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn pause_resume_publishes_identical_state() {
        let mut h = harness();
        h.tokens.set_once(SessionToken::new("tok").unwrap());
        h.api.push_questions(numbered_questions(2));
        let before = h.session.start(five_easy_general()).await.unwrap();

        let paused = h.session.pause().unwrap();
        assert!(paused.is_game_paused());
        let resumed = h.session.resume().unwrap();

        assert_eq!(resumed, before);
    }

    #[tokio::test]
    async fn play_again_resets_after_finished_game() {
        let mut h = harness();
        h.tokens.set_once(SessionToken::new("tok").unwrap());
        h.api.push_questions(numbered_questions(1));
        h.session.start(five_easy_general()).await.unwrap();
        h.session.submit_answer("wrong").await.unwrap();
        assert_eq!(h.session.phase(), QuizPhase::GameOver);

        let state = h.session.play_again().unwrap();

        assert_eq!(state, QuizUiState::not_started());
        assert!(h.session.store().is_empty());
        assert_eq!(h.high_scores.get().await.unwrap(), Score::ZERO);
    }
}
