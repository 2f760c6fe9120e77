use std::sync::Arc;

use storage::{CategoryCatalog, SessionTokenHolder, Storage};

use crate::Clock;
use crate::api::{ApiConfig, OpenTriviaClient, TriviaApi};
use crate::error::AppServicesError;
use crate::fetchers::{CategoryFetcher, QuestionFetcher, TokenFetcher};
use crate::high_score_service::HighScoreService;
use crate::quiz::{AnswerFeedback, QuizSession};

/// What the startup fetches achieved. Both may fail without stopping the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub categories_loaded: Option<usize>,
    pub token_acquired: bool,
}

/// Assembles the shared holders, fetchers and services for one process.
#[derive(Clone)]
pub struct AppServices {
    api: Arc<dyn TriviaApi>,
    tokens: SessionTokenHolder,
    catalog: CategoryCatalog,
    high_scores: HighScoreService,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, api: Arc<dyn TriviaApi>, clock: Clock) -> Self {
        Self {
            api,
            tokens: SessionTokenHolder::new(),
            catalog: CategoryCatalog::new(),
            high_scores: HighScoreService::new(clock, Arc::clone(&storage.high_scores)),
        }
    }

    /// Build services backed by `SQLite` storage and the HTTP trivia client.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built from `api_config`.
    pub async fn new_sqlite(
        db_url: &str,
        api_config: &ApiConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api: Arc<dyn TriviaApi> = Arc::new(OpenTriviaClient::new(api_config)?);
        Ok(Self::new(&storage, api, clock))
    }

    /// Fetch the category list and a session token concurrently.
    pub async fn bootstrap(&self) -> StartupReport {
        let categories = self.category_fetcher();
        let tokens = self.token_fetcher();
        let (loaded, acquired) = tokio::join!(categories.refresh(), tokens.acquire());

        let categories_loaded = match loaded {
            Ok(count) => Some(count),
            Err(err) => {
                tracing::warn!(error = %err, "category list unavailable");
                None
            }
        };
        if let Err(err) = &acquired {
            tracing::warn!(error = %err, "session token unavailable");
        }

        StartupReport {
            categories_loaded,
            token_acquired: !self.tokens.is_empty(),
        }
    }

    #[must_use]
    pub fn category_fetcher(&self) -> CategoryFetcher {
        CategoryFetcher::new(Arc::clone(&self.api), self.catalog.clone())
    }

    #[must_use]
    pub fn question_fetcher(&self) -> QuestionFetcher {
        QuestionFetcher::new(Arc::clone(&self.api), self.tokens.clone())
    }

    #[must_use]
    pub fn token_fetcher(&self) -> TokenFetcher {
        TokenFetcher::new(Arc::clone(&self.api), self.tokens.clone())
    }

    /// A fresh quiz sharing this process's token, catalog and high score.
    #[must_use]
    pub fn quiz_session(&self, feedback: Arc<dyn AnswerFeedback>) -> QuizSession {
        QuizSession::new(
            self.question_fetcher(),
            self.token_fetcher(),
            self.high_scores.clone(),
            feedback,
        )
    }

    #[must_use]
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn tokens(&self) -> &SessionTokenHolder {
        &self.tokens
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScoreService {
        &self.high_scores
    }
}
