use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::types::Token;

/// Seconds before the recorded expiry at which a token counts as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 240;

/// In-memory holder of the current token pair.
///
/// Clones share the same slot. There is one slot per process, so the service
/// serves a single Spotify account at a time; a second login replaces the
/// first user's tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<Token>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access token, or an empty string before the first login.
    pub async fn access_token(&self) -> String {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
            .unwrap_or_default()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    pub async fn current(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    pub async fn replace(&self, token: Token) {
        *self.token.write().await = Some(token);
    }

    /// True when the stored token expires within [`EXPIRY_MARGIN_SECS`].
    ///
    /// A token without a known expiry, or no token at all, is never expired.
    pub async fn is_expired(&self) -> bool {
        let lock = self.token.read().await;
        match lock.as_ref().and_then(|t| t.expires_at) {
            Some(expires_at) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in: Option<i64>) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            scope: None,
            expires_at: expires_in.map(|s| Utc::now() + Duration::seconds(s)),
        }
    }

    #[tokio::test]
    async fn empty_store_has_empty_access_token() {
        let store = TokenStore::new();
        assert_eq!(store.access_token().await, "");
        assert_eq!(store.refresh_token().await, None);
        assert!(!store.is_expired().await);
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let store = TokenStore::new();
        let other = store.clone();
        other.replace(token(Some(3600))).await;

        assert_eq!(store.access_token().await, "access");
        assert_eq!(store.current().await, other.current().await);
    }

    #[tokio::test]
    async fn expiry_honours_margin() {
        let store = TokenStore::new();

        store.replace(token(Some(3600))).await;
        assert!(!store.is_expired().await);

        store.replace(token(Some(120))).await;
        assert!(store.is_expired().await);

        store.replace(token(None)).await;
        assert!(!store.is_expired().await);
    }
}
