use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use trivia_core::model::{CategoryId, Difficulty, SessionSelection, SessionToken};

use super::config::ApiConfig;
use super::wire::{CategoriesEnvelope, QuestionsEnvelope, TokenEnvelope, decode_body};
use crate::error::{ApiConfigError, FetchError};

/// Parameters of a question request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub amount: u32,
    pub category: CategoryId,
    pub difficulty: Difficulty,
    /// Empty when no session token is held.
    pub token: String,
}

impl QuestionQuery {
    #[must_use]
    pub fn new(selection: &SessionSelection, token: impl Into<String>) -> Self {
        Self {
            amount: selection.amount().value(),
            category: selection.category().id(),
            difficulty: selection.difficulty(),
            token: token.into(),
        }
    }

    fn to_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("amount", self.amount.to_string()),
            ("category", self.category.to_string()),
            ("difficulty", self.difficulty.as_api_str().to_owned()),
            ("token", self.token.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCommand {
    Request,
    Reset(SessionToken),
}

/// The three read-only endpoints of the trivia API.
#[async_trait]
pub trait TriviaApi: Send + Sync {
    /// `GET api.php`
    async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsEnvelope, FetchError>;

    /// `GET api_category.php`
    async fn categories(&self) -> Result<CategoriesEnvelope, FetchError>;

    /// `GET api_token.php`
    async fn token(&self, command: &TokenCommand) -> Result<TokenEnvelope, FetchError>;
}

/// `reqwest`-backed client for Open Trivia DB.
#[derive(Clone, Debug)]
pub struct OpenTriviaClient {
    client: Client,
    questions_url: Url,
    categories_url: Url,
    token_url: Url,
}

impl OpenTriviaClient {
    /// Build a client; every request is bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError` if the endpoints cannot be derived from the base URL
    /// or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            questions_url: config.endpoint("api.php")?,
            categories_url: config.endpoint("api_category.php")?,
            token_url: config.endpoint("api_token.php")?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        tracing::debug!(%url, "trivia api request");
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::from_transport(&err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RemoteFailure {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::from_transport(&err))?;
        decode_body(&body)
    }
}

#[async_trait]
impl TriviaApi for OpenTriviaClient {
    async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsEnvelope, FetchError> {
        self.get_json(&self.questions_url, &query.to_pairs()).await
    }

    async fn categories(&self) -> Result<CategoriesEnvelope, FetchError> {
        self.get_json(&self.categories_url, &[]).await
    }

    async fn token(&self, command: &TokenCommand) -> Result<TokenEnvelope, FetchError> {
        let query = match command {
            TokenCommand::Request => vec![("command", "request".to_owned())],
            TokenCommand::Reset(token) => vec![
                ("command", "reset".to_owned()),
                ("token", token.as_str().to_owned()),
            ],
        };
        self.get_json(&self.token_url, &query).await
    }
}
