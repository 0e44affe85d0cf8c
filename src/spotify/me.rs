use serde_json::{Map, Value};

use super::{SpotifyClient, SpotifyError, segment};
use crate::types::{Artist, Paging, TimeRange, Track};

/// Number of items requested from the top tracks/artists endpoints.
pub const TOP_ITEMS_LIMIT: u32 = 10;

impl SpotifyClient {
    /// Profile of the signed-in user, as returned by `GET /me`.
    pub async fn me(&self, token: &str) -> Result<Map<String, Value>, SpotifyError> {
        self.get(token, "/me", &[]).await
    }

    pub async fn user_playlists(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<Paging<Value>, SpotifyError> {
        let path = format!("/users/{id}/playlists", id = segment(user_id));
        self.get(token, &path, &[]).await
    }

    pub async fn top_tracks(
        &self,
        token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, SpotifyError> {
        let limit = limit.to_string();
        let page: Paging<Track> = self
            .get(
                token,
                "/me/top/tracks",
                &[("time_range", range.as_str()), ("limit", limit.as_str())],
            )
            .await?;

        Ok(page.items)
    }

    pub async fn top_artists(
        &self,
        token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, SpotifyError> {
        let limit = limit.to_string();
        let page: Paging<Artist> = self
            .get(
                token,
                "/me/top/artists",
                &[("time_range", range.as_str()), ("limit", limit.as_str())],
            )
            .await?;

        Ok(page.items)
    }
}
