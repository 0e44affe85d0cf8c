use axum::{
    Json,
    extract::{Path, State},
};

use super::{ApiError, access_token};
use crate::{
    state::AppState,
    types::{AlbumEnvelope, ArtistEnvelope, TrackEnvelope},
    utils,
};

pub async fn track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackEnvelope>, ApiError> {
    let token = access_token(&state).await?;
    let track = state.spotify.track(&token, &id).await?;

    Ok(Json(TrackEnvelope {
        track: utils::track_details(&track),
    }))
}

/// Artist page: the artist, their top tracks and their latest albums.
///
/// The three upstream calls run in parallel and all of them must succeed.
pub async fn artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArtistEnvelope>, ApiError> {
    let token = access_token(&state).await?;
    let spotify = &state.spotify;

    let (artist, top_tracks, albums) = tokio::try_join!(
        spotify.artist(&token, &id),
        spotify.artist_top_tracks(&token, &id),
        spotify.artist_albums(&token, &id),
    )?;

    Ok(Json(ArtistEnvelope {
        artist: utils::artist_details(&artist, top_tracks, albums),
    }))
}

pub async fn album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AlbumEnvelope>, ApiError> {
    let token = access_token(&state).await?;
    let album = state.spotify.album(&token, &id).await?;

    Ok(Json(AlbumEnvelope {
        album: utils::album_details(&album),
    }))
}
