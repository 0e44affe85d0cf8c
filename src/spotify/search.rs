use serde_json::Value;

use super::{SpotifyClient, SpotifyError};
use crate::types::{SearchKind, SearchResponse};

impl SpotifyClient {
    /// Searches the catalog for one kind of item.
    ///
    /// Returns the raw items of the matching result page, untouched, so the
    /// frontend receives Spotify's own track, artist or album objects.
    pub async fn search(
        &self,
        token: &str,
        query: &str,
        kind: SearchKind,
    ) -> Result<Vec<Value>, SpotifyError> {
        let res: SearchResponse = self
            .get(token, "/search", &[("q", query), ("type", kind.as_str())])
            .await?;

        let page = match kind {
            SearchKind::Track => res.tracks,
            SearchKind::Artist => res.artists,
            SearchKind::Album => res.albums,
        };

        Ok(page.map(|p| p.items).unwrap_or_default())
    }
}
