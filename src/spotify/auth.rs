use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Url;

use super::{SpotifyClient, SpotifyError, decode};
use crate::types::{Token, TokenResponse};

/// Permissions requested on every login.
pub const SCOPES: [&str; 19] = [
    "ugc-image-upload",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "streaming",
    "app-remote-control",
    "user-read-email",
    "user-read-private",
    "playlist-read-collaborative",
    "playlist-modify-public",
    "playlist-read-private",
    "playlist-modify-private",
    "user-library-modify",
    "user-library-read",
    "user-top-read",
    "user-read-playback-position",
    "user-read-recently-played",
    "user-follow-read",
    "user-follow-modify",
];

/// Builds the URL the browser is sent to for granting access.
///
/// # Arguments
///
/// * `authorize_url` - Spotify authorize endpoint
/// * `client_id` - Client ID of the registered application
/// * `redirect_uri` - Callback URL registered with Spotify
/// * `state` - CSRF nonce that Spotify echoes back on the callback
///
/// # Example
///
/// ```
/// let url = authorize_url(&base, "abc123", "http://localhost:3000/callback", "Xy7...");
/// // https://accounts.spotify.com/authorize?client_id=abc123&response_type=code&...
/// ```
pub fn authorize_url(authorize_url: &Url, client_id: &str, redirect_uri: &str, state: &str) -> Url {
    let mut url = authorize_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &SCOPES.join(" "))
        .append_pair("state", state);
    url
}

impl SpotifyClient {
    /// Exchanges an authorization code for an access token.
    ///
    /// Completes the authorization-code flow with a server-to-server POST to
    /// the token endpoint, authenticated with HTTP Basic auth of the client
    /// ID and secret. The code is single-use and expires quickly, so the
    /// exchange happens immediately after the callback.
    ///
    /// # Returns
    ///
    /// - `Ok(Token)` - Access token, refresh token, scope and expiry
    /// - `Err(SpotifyError)` - Network error or a rejected code
    pub async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        self.token_grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Spotify may or may not rotate the refresh token; when the response
    /// carries none, the returned token's `refresh_token` is `None` and the
    /// caller keeps the one it already has.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        self.token_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<Token, SpotifyError> {
        let response = self
            .http
            .post(self.token_url.clone())
            .header("Authorization", self.basic_auth())
            .form(form)
            .send()
            .await?;

        let body: TokenResponse = decode(response).await?;
        if body.access_token.is_empty() {
            return Err(SpotifyError::Decode(
                "token response without access_token".to_string(),
            ));
        }

        Ok(Token::from_response(body, Utc::now()))
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}
