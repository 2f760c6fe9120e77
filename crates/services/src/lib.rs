#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod fetchers;
pub mod high_score_service;
pub mod quiz;

#[cfg(test)]
pub(crate) mod testing;

pub use trivia_core::Clock;

pub use api::{ApiConfig, OpenTriviaClient, ResponseCode, TriviaApi};
pub use app_services::{AppServices, StartupReport};
pub use error::{ApiConfigError, AppServicesError, FetchError, FetchFailureKind, QuizError};
pub use fetchers::{CategoryFetcher, QuestionFetcher, TokenFetcher};
pub use high_score_service::HighScoreService;
pub use quiz::{
    AnswerFeedback, AnswerOutcome, FeedbackCue, LogFeedback, QuizAction, QuizEngine, QuizSession,
    shuffled_options,
};
