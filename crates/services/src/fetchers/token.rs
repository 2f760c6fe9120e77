use std::sync::Arc;

use storage::SessionTokenHolder;
use trivia_core::model::SessionToken;

use crate::api::{ResponseCode, TokenCommand, TokenEnvelope, TriviaApi};
use crate::error::FetchError;

/// Obtains and resets the API session token.
#[derive(Clone)]
pub struct TokenFetcher {
    api: Arc<dyn TriviaApi>,
    tokens: SessionTokenHolder,
}

impl TokenFetcher {
    #[must_use]
    pub fn new(api: Arc<dyn TriviaApi>, tokens: SessionTokenHolder) -> Self {
        Self { api, tokens }
    }

    #[must_use]
    pub fn holder(&self) -> &SessionTokenHolder {
        &self.tokens
    }

    /// Request a token unless one is already held.
    ///
    /// Returns `true` when a new token was stored. On failure the holder stays
    /// empty and question fetches go out without a token.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails or yields no usable token.
    pub async fn acquire(&self) -> Result<bool, FetchError> {
        if !self.tokens.is_empty() {
            return Ok(false);
        }

        let envelope = self
            .api
            .token(&TokenCommand::Request)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "token request failed"))?;
        let token = usable_token(envelope)?;
        let stored = self.tokens.set_once(token);
        tracing::info!(stored, "session token acquired");
        Ok(stored)
    }

    /// Ask the server to reset the held token so its questions can repeat again.
    ///
    /// Falls back to [`TokenFetcher::acquire`] when no token is held.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails or yields no usable token.
    pub async fn reset(&self) -> Result<(), FetchError> {
        let Some(current) = self.tokens.get() else {
            return self.acquire().await.map(|_| ());
        };

        let envelope = self
            .api
            .token(&TokenCommand::Reset(current))
            .await
            .inspect_err(|err| tracing::error!(error = %err, "token reset failed"))?;
        let token = usable_token(envelope)?;
        self.tokens.replace(token);
        tracing::info!("session token reset");
        Ok(())
    }
}

fn usable_token(envelope: TokenEnvelope) -> Result<SessionToken, FetchError> {
    match ResponseCode::from(envelope.response_code) {
        ResponseCode::Success => SessionToken::new(envelope.token)
            .ok_or_else(|| FetchError::Malformed("token response without a token".into())),
        code => Err(FetchError::Api(code)),
    }
}
