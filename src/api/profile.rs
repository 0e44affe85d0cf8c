use axum::{Json, extract::State};
use serde_json::Value;

use super::{ApiError, access_token};
use crate::{spotify::SpotifyError, state::AppState};

/// Profile of the signed-in user with their playlists attached.
///
/// Returns Spotify's profile object unchanged apart from two extra fields:
/// `playlists` (first page of the user's playlists) and `totalPlaylists`.
pub async fn user_profile(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let token = access_token(&state).await?;

    let mut profile = state.spotify.me(&token).await?;
    let user_id = profile
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| SpotifyError::Decode("profile without id".to_string()))?
        .to_string();

    let playlists = state.spotify.user_playlists(&token, &user_id).await?;

    profile.insert("totalPlaylists".to_string(), Value::from(playlists.total));
    profile.insert("playlists".to_string(), Value::Array(playlists.items));

    Ok(Json(Value::Object(profile)))
}
