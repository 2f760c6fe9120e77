//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use trivia_core::model::QuizPhase;

use crate::api::ResponseCode;

/// Errors emitted at the remote API boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("trivia API unreachable: {0}")]
    Connectivity(String),
    #[error("trivia API request failed with status {status}")]
    RemoteFailure { status: u16 },
    #[error("unexpected trivia API response: {0}")]
    Malformed(String),
    #[error("trivia API refused the request: {0}")]
    Api(ResponseCode),
}

/// Coarse classification of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// No network reachable, or the request timed out.
    Connectivity,
    /// The server answered, but not with something usable.
    RemoteFailure,
}

impl FetchError {
    #[must_use]
    pub fn kind(&self) -> FetchFailureKind {
        match self {
            FetchError::Connectivity(_) => FetchFailureKind::Connectivity,
            FetchError::RemoteFailure { .. } | FetchError::Malformed(_) | FetchError::Api(_) => {
                FetchFailureKind::RemoteFailure
            }
        }
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            FetchError::Connectivity(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::RemoteFailure {
                status: status.as_u16(),
            }
        } else if err.is_decode() || err.is_body() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Connectivity(err.to_string())
        }
    }
}

/// Errors emitted while building the API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiConfigError {
    #[error("invalid trivia API base URL {raw:?}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Errors emitted by the quiz engine and session workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        phase: QuizPhase,
        action: crate::quiz::QuizAction,
    },
    #[error("answer for question {got} arrived while question {expected} is shown")]
    StaleAnswer { expected: u32, got: u32 },
    #[error("no questions available for session")]
    NoQuestions,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ApiConfig(#[from] ApiConfigError),
}
