use std::{fmt, future::Future};

use reqwest::Url;
use serde::Deserialize;

use super::TokenStore;
use crate::{
    config::Settings,
    spotify::{self, SpotifyClient, SpotifyError},
    types::Token,
    utils, warning,
};

/// Name of the cookie holding the pending login state.
pub const STATE_KEY: &str = "spotify_auth_state";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The callback `state` was missing or did not match the issued one.
    StateMismatch,
    /// Spotify refused to hand out a token for the authorization code.
    TokenExchangeFailed(String),
    /// The refresh token was rejected; the user has to log in again.
    RefreshFailed(String),
}

impl AuthError {
    /// Where the browser is sent after a failed callback.
    pub fn redirect_target(&self) -> String {
        match self {
            AuthError::StateMismatch => "/#error=state_mismatch".to_string(),
            AuthError::TokenExchangeFailed(message) | AuthError::RefreshFailed(message) => {
                format!(
                    "/#error=invalid_token&message={}",
                    urlencoding::encode(message)
                )
            }
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::StateMismatch => write!(f, "state mismatch"),
            AuthError::TokenExchangeFailed(msg) => write!(f, "token exchange failed: {}", msg),
            AuthError::RefreshFailed(msg) => write!(f, "token refresh failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// The two OAuth grants the flow needs from the accounts service.
pub trait TokenGrant: Send + Sync {
    fn authorization_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Token, SpotifyError>> + Send;

    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<Token, SpotifyError>> + Send;
}

impl TokenGrant for SpotifyClient {
    async fn authorization_code(&self, code: &str) -> Result<Token, SpotifyError> {
        self.exchange_code(code).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        self.refresh_token(refresh_token).await
    }
}

/// Query parameters Spotify appends to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub state: String,
    pub url: Url,
}

/// Authorization flow controller.
///
/// Drives the authorization-code flow for one browser at a time:
///
/// ```text
/// IDLE ──begin_login──▶ AWAITING_CALLBACK ──handle_callback──▶ AUTHORIZED
///   ▲                                          │
///   └──────────────── FAILED ◀─────────────────┘
/// ```
///
/// The pending state lives in a browser cookie, so the controller itself
/// only owns the grant implementation and the token store.
#[derive(Debug)]
pub struct AuthFlow<G> {
    grant: G,
    tokens: TokenStore,
    authorize_url: Url,
    client_id: String,
    redirect_uri: String,
}

impl<G: TokenGrant> AuthFlow<G> {
    pub fn new(grant: G, tokens: TokenStore, settings: &Settings) -> Self {
        AuthFlow {
            grant,
            tokens,
            authorize_url: settings.authorize_url.clone(),
            client_id: settings.client_id.clone(),
            redirect_uri: settings.redirect_uri.clone(),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn grant(&self) -> &G {
        &self.grant
    }

    /// Starts a login attempt.
    ///
    /// Generates a fresh state and the authorize URL carrying it. The caller
    /// stores the state in the browser, replacing any pending attempt.
    pub fn begin_login(&self) -> LoginRedirect {
        let state = utils::generate_state();
        let url = spotify::auth::authorize_url(
            &self.authorize_url,
            &self.client_id,
            &self.redirect_uri,
            &state,
        );

        LoginRedirect { state, url }
    }

    /// Completes a login attempt.
    ///
    /// `stored_state` is the state issued by [`AuthFlow::begin_login`] for
    /// this browser. It is taken out of the slot once it matched, so a
    /// replayed callback fails with [`AuthError::StateMismatch`].
    ///
    /// # Errors
    ///
    /// - [`AuthError::StateMismatch`] - `state` absent or different; no
    ///   exchange is attempted and the slot is left as it was
    /// - [`AuthError::TokenExchangeFailed`] - the user denied access, the code
    ///   is missing, or Spotify rejected it; the token store is unchanged
    pub async fn handle_callback(
        &self,
        params: &CallbackParams,
        stored_state: &mut Option<String>,
    ) -> Result<(), AuthError> {
        let received = params.state.as_deref().filter(|s| !s.is_empty());
        let expected = stored_state.as_deref().filter(|s| !s.is_empty());
        match (received, expected) {
            (Some(received), Some(expected)) if received == expected => {}
            _ => return Err(AuthError::StateMismatch),
        }
        stored_state.take();

        if let Some(error) = params.error.as_deref() {
            return Err(AuthError::TokenExchangeFailed(error.to_string()));
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AuthError::TokenExchangeFailed("missing authorization code".to_string())
            })?;

        let token = self
            .grant
            .authorization_code(code)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        self.tokens.replace(token).await;
        Ok(())
    }

    /// Current access token, empty before the first login. Never refreshes.
    pub async fn access_token(&self) -> String {
        self.tokens.access_token().await
    }

    /// Exchanges `refresh_token` for a new access token and stores it.
    ///
    /// When Spotify does not rotate the refresh token the one passed in is
    /// kept. On failure the stored token is left untouched.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let mut token = self
            .grant
            .refresh(refresh_token)
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }

        let access_token = token.access_token.clone();
        self.tokens.replace(token).await;
        Ok(access_token)
    }

    /// Access token for upstream calls, refreshed first when about to expire.
    ///
    /// A failed refresh is logged and the stale token returned; the upstream
    /// call will then fail on its own and be reported to the client.
    pub async fn valid_access_token(&self) -> String {
        if self.tokens.is_expired().await {
            if let Some(refresh_token) = self.tokens.refresh_token().await {
                if let Err(e) = self.refresh_access_token(&refresh_token).await {
                    warning!("Could not refresh expired access token: {}", e);
                }
            }
        }

        self.tokens.access_token().await
    }
}
