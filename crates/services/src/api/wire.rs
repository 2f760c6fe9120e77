use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::error::FetchError;

/// `response_code` values returned by the trivia API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimited,
    Unknown(i64),
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NoResults,
            2 => Self::InvalidParameter,
            3 => Self::TokenNotFound,
            4 => Self::TokenEmpty,
            5 => Self::RateLimited,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Success => f.write_str("success"),
            ResponseCode::NoResults => f.write_str("not enough questions for the query"),
            ResponseCode::InvalidParameter => f.write_str("invalid parameter"),
            ResponseCode::TokenNotFound => f.write_str("session token not found"),
            ResponseCode::TokenEmpty => f.write_str("session token exhausted"),
            ResponseCode::RateLimited => f.write_str("rate limited"),
            ResponseCode::Unknown(code) => write!(f, "unknown response code {code}"),
        }
    }
}

/// Body of `GET api.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsEnvelope {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

/// One question as sent by the server. Text fields are HTML-escaped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

/// Body of `GET api_category.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesEnvelope {
    pub trivia_categories: Vec<RawCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub id: u32,
    pub name: String,
}

/// Body of `GET api_token.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEnvelope {
    pub response_code: i64,
    #[serde(default)]
    pub response_message: String,
    #[serde(default)]
    pub token: String,
}

/// Parse a JSON response body. Empty and `null` bodies are malformed.
///
/// # Errors
///
/// Returns `FetchError::Malformed` when the body does not match `T`.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::Malformed("empty body".into()));
    }
    serde_json::from_slice(body).map_err(|err| FetchError::Malformed(err.to_string()))
}
