use std::sync::{Arc, PoisonError, RwLock};

use trivia_core::model::SessionToken;

/// Shared slot for the API session token.
///
/// Empty at cold start. Cloning yields another handle to the same slot, so the
/// token fetcher and the question fetcher can each hold one.
#[derive(Debug, Clone, Default)]
pub struct SessionTokenHolder {
    slot: Arc<RwLock<Option<SessionToken>>>,
}

impl SessionTokenHolder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<SessionToken> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The value sent as the `token` query parameter; empty when no token is held.
    #[must_use]
    pub fn query_value(&self) -> String {
        self.get()
            .map(|token| token.as_str().to_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Store `token` unless one is already held. Returns `true` if stored.
    pub fn set_once(&self, token: SessionToken) -> bool {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            return false;
        }
        *guard = Some(token);
        true
    }

    /// Overwrite the held token, e.g. after the server reset it.
    pub fn replace(&self, token: SessionToken) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the held token; returns what was held.
    pub fn clear(&self) -> Option<SessionToken> {
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(raw: &str) -> SessionToken {
        SessionToken::new(raw).unwrap()
    }

    #[test]
    fn starts_empty_with_blank_query_value() {
        let holder = SessionTokenHolder::new();
        assert!(holder.is_empty());
        assert_eq!(holder.query_value(), "");
    }

    #[test]
    fn first_token_wins() {
        let holder = SessionTokenHolder::new();
        assert!(holder.set_once(token("abc")));
        assert!(!holder.set_once(token("def")));
        assert_eq!(holder.query_value(), "abc");
    }

    #[test]
    fn clones_share_the_slot() {
        let holder = SessionTokenHolder::new();
        let other = holder.clone();
        holder.set_once(token("abc"));
        assert_eq!(other.get(), Some(token("abc")));

        other.clear();
        assert!(holder.is_empty());
    }
}
