//! Shared application state.
//!
//! Everything a handler needs is reachable from [`AppState`], which axum
//! clones into each request. There is no global mutable state.

use std::sync::Arc;

use crate::{
    config::Settings,
    management::{AuthFlow, TokenStore},
    spotify::{SpotifyClient, SpotifyError},
};

#[derive(Debug, Clone)]
pub struct AppState {
    /// Settings loaded at startup.
    pub settings: Arc<Settings>,
    /// Client used by the proxy endpoints.
    pub spotify: SpotifyClient,
    /// Login flow; owns the token store.
    pub auth: Arc<AuthFlow<SpotifyClient>>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, SpotifyError> {
        let spotify = SpotifyClient::new(&settings)?;
        let auth = AuthFlow::new(spotify.clone(), TokenStore::new(), &settings);

        Ok(AppState {
            settings: Arc::new(settings),
            spotify,
            auth: Arc::new(auth),
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        self.auth.tokens()
    }
}
