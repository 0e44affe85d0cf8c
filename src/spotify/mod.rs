//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API and accounts
//! service used by the web server. It hides HTTP details behind awaitable
//! operations on [`SpotifyClient`], each returning a `Result` whose error
//! side is [`SpotifyError`].
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorize URL, code and refresh grants)
//!     ├── Current user (profile, playlists, top tracks/artists)
//!     ├── Catalog (tracks, artists, albums)
//!     └── Search
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error Handling
//!
//! Requests are never retried. A transport error, a non-success status or
//! an undecodable body is returned to the caller immediately; the handler
//! layer decides whether the failure fails the whole response or only drops
//! one item from an aggregation.
//!
//! ## API Coverage
//!
//! - `GET /me`, `GET /users/{id}/playlists`
//! - `GET /me/top/tracks`, `GET /me/top/artists`
//! - `GET /tracks/{id}`, `GET /albums/{id}`
//! - `GET /artists`, `GET /artists/{id}`, `GET /artists/{id}/top-tracks`,
//!   `GET /artists/{id}/albums`
//! - `GET /search`
//! - `POST /api/token` (accounts service)

use std::{fmt, time::Duration};

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Settings;

pub mod auth;
pub mod catalog;
pub mod me;
pub mod search;

pub use auth::SCOPES;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum SpotifyError {
    Http(reqwest::Error),
    Status { status: StatusCode, message: String },
    Decode(String),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "request to Spotify failed: {}", e),
            SpotifyError::Status { status, message } => {
                write!(f, "Spotify responded with {}: {}", status, message)
            }
            SpotifyError::Decode(msg) => write!(f, "unexpected response from Spotify: {}", msg),
        }
    }
}

impl std::error::Error for SpotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotifyError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SpotifyError::Decode(err.to_string())
        } else {
            SpotifyError::Http(err)
        }
    }
}

/// Client for the Spotify Web API and accounts service.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: Url,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    market: String,
}

impl SpotifyClient {
    pub fn new(settings: &Settings) -> Result<Self, SpotifyError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(SpotifyClient {
            http,
            api_url: settings.api_url.clone(),
            token_url: settings.token_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            market: settings.market.clone(),
        })
    }

    /// Issues an authenticated `GET {api_url}{path}` and decodes the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SpotifyError> {
        let url = format!("{uri}{path}", uri = self.api_url, path = path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SpotifyError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SpotifyError::Status {
            status,
            message: upstream_message(status, &body),
        });
    }

    Ok(response.json::<T>().await?)
}

/// Extracts a human readable message from a Spotify error body.
///
/// The Web API answers `{"error": {"status": 401, "message": "..."}}`, the
/// accounts service `{"error": "invalid_grant", "error_description": "..."}`.
pub fn upstream_message(status: StatusCode, body: &str) -> String {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    let message = json["error_description"]
        .as_str()
        .or_else(|| json["error"]["message"].as_str())
        .or_else(|| json["error"].as_str());

    match message {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

/// Percent-encodes a path segment taken from user input.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_api_error_message_is_extracted() {
        let body = r#"{"error":{"status":401,"message":"The access token expired"}}"#;
        assert_eq!(
            upstream_message(StatusCode::UNAUTHORIZED, body),
            "The access token expired"
        );
    }

    #[test]
    fn accounts_error_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#;
        assert_eq!(
            upstream_message(StatusCode::BAD_REQUEST, body),
            "Invalid authorization code"
        );

        let body = r#"{"error":"invalid_client"}"#;
        assert_eq!(upstream_message(StatusCode::BAD_REQUEST, body), "invalid_client");
    }

    #[test]
    fn unparsable_body_falls_back_to_status_reason() {
        assert_eq!(
            upstream_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(segment("abc/../me"), "abc%2F..%2Fme");
        assert_eq!(segment("4NHQUGzhtTLFvgF5SZesLK"), "4NHQUGzhtTLFvgF5SZesLK");
    }
}
