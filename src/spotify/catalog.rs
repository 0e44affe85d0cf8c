use serde_json::Value;

use super::{SpotifyClient, SpotifyError, segment};
use crate::types::{
    Album, Artist, ArtistTopTracksResponse, Paging, SeveralArtistsResponse, Track,
};

/// Maximum number of ids accepted by `GET /artists`.
pub const MAX_ARTISTS_PER_REQUEST: usize = 50;

/// Number of albums listed on an artist page.
pub const ARTIST_ALBUMS_LIMIT: u32 = 10;

impl SpotifyClient {
    pub async fn track(&self, token: &str, id: &str) -> Result<Track, SpotifyError> {
        let path = format!("/tracks/{id}", id = segment(id));
        self.get(token, &path, &[]).await
    }

    pub async fn album(&self, token: &str, id: &str) -> Result<Album, SpotifyError> {
        let path = format!("/albums/{id}", id = segment(id));
        self.get(token, &path, &[]).await
    }

    pub async fn artist(&self, token: &str, id: &str) -> Result<Artist, SpotifyError> {
        let path = format!("/artists/{id}", id = segment(id));
        self.get(token, &path, &[]).await
    }

    /// Retrieves several artists in one request.
    ///
    /// Accepts at most [`MAX_ARTISTS_PER_REQUEST`] ids; callers chunk larger
    /// sets. Ids Spotify does not know come back as `null` and are skipped.
    pub async fn several_artists(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<Artist>, SpotifyError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_ARTISTS_PER_REQUEST {
            return Err(SpotifyError::Decode(format!(
                "at most {} artists per request, got {}",
                MAX_ARTISTS_PER_REQUEST,
                ids.len()
            )));
        }

        let ids = ids.join(",");
        let res: SeveralArtistsResponse = self
            .get(token, "/artists", &[("ids", ids.as_str())])
            .await?;

        Ok(res.artists.into_iter().flatten().collect())
    }

    pub async fn artist_top_tracks(
        &self,
        token: &str,
        id: &str,
    ) -> Result<Vec<Value>, SpotifyError> {
        let path = format!("/artists/{id}/top-tracks", id = segment(id));
        let res: ArtistTopTracksResponse = self
            .get(token, &path, &[("market", self.market.as_str())])
            .await?;

        Ok(res.tracks)
    }

    pub async fn artist_albums(&self, token: &str, id: &str) -> Result<Vec<Value>, SpotifyError> {
        let path = format!("/artists/{id}/albums", id = segment(id));
        let limit = ARTIST_ALBUMS_LIMIT.to_string();
        let page: Paging<Value> = self.get(token, &path, &[("limit", limit.as_str())]).await?;

        Ok(page.items)
    }
}
