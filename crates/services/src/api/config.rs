use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ApiConfigError;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const BASE_URL_VAR: &str = "TRIVIA_API_BASE_URL";
const TIMEOUT_VAR: &str = "TRIVIA_API_TIMEOUT_SECS";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Absolute URL ending in `/`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("trivia-quiz/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Read `TRIVIA_API_BASE_URL` and `TRIVIA_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ApiConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ApiConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(&raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ApiConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Point the client at another server. A trailing `/` is added so endpoint
    /// paths resolve below the given prefix.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError::InvalidBaseUrl` if `raw` is not an absolute URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ApiConfigError> {
        let trimmed = raw.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };
        Url::parse(&normalized).map_err(|source| ApiConfigError::InvalidBaseUrl {
            raw: raw.to_owned(),
            source,
        })?;
        self.base_url = normalized;
        Ok(self)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiConfigError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|source| ApiConfigError::InvalidBaseUrl {
                raw: self.base_url.clone(),
                source,
            })
    }
}
