use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::{ApiError, access_token};
use crate::{
    analysis::{self, TOP_ALBUMS_LIMIT},
    spotify::{catalog::MAX_ARTISTS_PER_REQUEST, me::TOP_ITEMS_LIMIT},
    state::AppState,
    types::{TimeRange, TopData},
};

#[derive(Debug, Deserialize)]
pub struct TopDataParams {
    range: Option<String>,
}

/// Top tracks, top artists and the facets derived from them.
///
/// # Flow
///
/// 1. Top tracks and top artists are fetched in parallel; either failing
///    fails the request.
/// 2. Albums are ranked by how many top tracks they hold and the first
///    [`TOP_ALBUMS_LIMIT`] are fetched in full, concurrently with the
///    artists whose genres are counted.
/// 3. Album and artist lookups that fail are dropped from the result.
pub async fn top_data(
    State(state): State<AppState>,
    Query(params): Query<TopDataParams>,
) -> Result<Json<TopData>, ApiError> {
    let range = match params.range.as_deref().filter(|r| !r.is_empty()) {
        Some(raw) => raw.parse::<TimeRange>().map_err(ApiError::BadRequest)?,
        None => TimeRange::default(),
    };
    let token = access_token(&state).await?;
    let spotify = &state.spotify;
    let token = token.as_str();

    let (top_tracks, top_artists) = tokio::try_join!(
        spotify.top_tracks(token, range, TOP_ITEMS_LIMIT),
        spotify.top_artists(token, range, TOP_ITEMS_LIMIT),
    )?;

    let album_ids: Vec<String> = analysis::rank_albums_by_frequency(&top_tracks)
        .into_iter()
        .take(TOP_ALBUMS_LIMIT)
        .map(|a| a.album_id)
        .collect();
    let artist_ids = analysis::unique_artist_ids(&top_tracks, &top_artists);

    let (top_albums, artist_batches) = tokio::join!(
        analysis::hydrate(album_ids, |id| async move { spotify.album(token, &id).await }),
        analysis::hydrate(artist_ids.chunks(MAX_ARTISTS_PER_REQUEST), |ids| async move {
            spotify.several_artists(token, ids).await
        }),
    );

    let genre_artists: Vec<_> = artist_batches.into_iter().flatten().collect();
    let artist_genres = analysis::collect_genres(&genre_artists)
        .into_iter()
        .map(|g| g.genre)
        .collect();

    Ok(Json(TopData {
        top_tracks,
        top_artists,
        top_albums,
        artist_genres,
    }))
}
