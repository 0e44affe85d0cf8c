use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::state::AppState;

/// Liveness probe; `authorized` tells whether a Spotify token is held.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let authorized = !state.auth.access_token().await.is_empty();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": authorized,
    }))
}
