use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::{ApiError, access_token};
use crate::{
    state::AppState,
    types::{SearchKind, SearchResults},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Searches tracks, artists or albums; `type` defaults to `track`.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing query".to_string()))?;
    let kind = match params.kind.as_deref().filter(|k| !k.is_empty()) {
        Some(raw) => raw.parse::<SearchKind>().map_err(ApiError::BadRequest)?,
        None => SearchKind::default(),
    };

    let token = access_token(&state).await?;
    let results = state.spotify.search(&token, &query, kind).await?;

    Ok(Json(SearchResults { results }))
}
