//! Open Trivia DB client and wire format.

mod client;
mod config;
mod wire;

pub use client::{OpenTriviaClient, QuestionQuery, TokenCommand, TriviaApi};
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use wire::{
    CategoriesEnvelope, QuestionsEnvelope, RawCategory, RawQuestion, ResponseCode, TokenEnvelope,
    decode_body,
};
