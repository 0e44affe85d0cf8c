//! # API Module
//!
//! HTTP handlers of the web server, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Sends the browser to Spotify's consent page with a fresh
//!   CSRF state stored in a cookie
//! - [`callback`] - Verifies the returned state and exchanges the code for
//!   tokens
//! - [`get_access_token`] - Current access token, empty before login
//! - [`refresh_token`] - Refresh-token grant
//!
//! ### Proxied data
//!
//! - [`user_profile`] - Profile with playlists
//! - [`top_data`] - Top tracks, top artists, top albums and top genres
//! - [`search`] - Track, artist or album search
//! - [`track`], [`artist`], [`album`] - Detail pages
//!
//! ### Monitoring
//!
//! - [`health`] - Status and version for load balancers
//!
//! ## Errors
//!
//! Proxy endpoints answer failures with a JSON `{ "error": ... }` body, see
//! [`ApiError`]. Nothing is retried.

mod auth;
mod catalog;
mod error;
mod health;
mod profile;
mod search;
mod top;

pub use auth::callback;
pub use auth::get_access_token;
pub use auth::login;
pub use auth::refresh_token;
pub use catalog::album;
pub use catalog::artist;
pub use catalog::track;
pub use error::ApiError;
pub use health::health;
pub use profile::user_profile;
pub use search::search;
pub use top::top_data;

use crate::state::AppState;

/// Access token for a proxied call, or [`ApiError::NotAuthorized`] before login.
async fn access_token(state: &AppState) -> Result<String, ApiError> {
    let token = state.auth.valid_access_token().await;
    if token.is_empty() {
        return Err(ApiError::NotAuthorized);
    }

    Ok(token)
}
