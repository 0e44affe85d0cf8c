use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{management::AuthError, spotify::SpotifyError, warning};

/// Failure of a proxy endpoint, rendered as a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub enum ApiError {
    /// No access token has been obtained yet.
    NotAuthorized,
    /// A query or path parameter was missing or invalid.
    BadRequest(String),
    /// The refresh grant failed; the user has to log in again.
    Auth(AuthError),
    /// The upstream call failed. Not retried.
    Upstream(SpotifyError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotAuthorized => write!(f, "not authorized"),
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::Auth(e) => write!(f, "{}", e),
            ApiError::Upstream(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SpotifyError> for ApiError {
    fn from(err: SpotifyError) -> Self {
        ApiError::Upstream(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotAuthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "not_authorized" }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Auth(AuthError::RefreshFailed(msg)) => {
                warning!("Token refresh failed: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "error": "refresh_failed", "message": msg }),
                )
            }
            ApiError::Auth(e) => (StatusCode::UNAUTHORIZED, json!({ "error": e.to_string() })),
            ApiError::Upstream(e) => {
                warning!("Upstream request failed: {}", e);
                (StatusCode::BAD_GATEWAY, json!({ "error": e.to_string() }))
            }
        };

        (status, Json(body)).into_response()
    }
}
