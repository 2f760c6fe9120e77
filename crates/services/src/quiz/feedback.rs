/// Cue played after an answer is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    Correct,
    Incorrect,
}

impl FeedbackCue {
    #[must_use]
    pub fn for_answer(was_correct: bool) -> Self {
        if was_correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}

/// Side channel for answer feedback (sound, haptics, terminal bell...).
///
/// Called once per judged answer, after the engine has already transitioned.
pub trait AnswerFeedback: Send + Sync {
    fn on_answer(&self, cue: FeedbackCue);
}

/// Feedback that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl AnswerFeedback for LogFeedback {
    fn on_answer(&self, cue: FeedbackCue) {
        tracing::debug!(?cue, "answer feedback");
    }
}
