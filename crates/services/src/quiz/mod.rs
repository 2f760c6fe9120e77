mod engine;
mod feedback;
mod options;
mod session;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use engine::{AnswerOutcome, QuizAction, QuizEngine};
pub use feedback::{AnswerFeedback, FeedbackCue, LogFeedback};
pub use options::shuffled_options;
pub use session::QuizSession;
