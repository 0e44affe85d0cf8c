//! Listening-habit facets derived from top tracks and top artists.
//!
//! Everything here is computed fresh per request. The ranking functions are
//! pure; [`hydrate`] runs caller-supplied lookups concurrently and drops the
//! ones that fail instead of failing the whole aggregation.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    future::Future,
};

use futures::future::join_all;

use crate::{
    types::{AlbumFrequency, Artist, GenreFrequency, Track},
    warning,
};

/// Number of ranked albums hydrated into full album records.
pub const TOP_ALBUMS_LIMIT: usize = 10;

/// Number of genres reported.
pub const TOP_GENRES_LIMIT: usize = 5;

/// Counts occurrences of `keys`, most frequent first, ties in first-seen order.
fn rank<I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for key in keys {
        match positions.get(&key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // sort_by is stable, so equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Ranks the albums of `tracks` by how many of the tracks they contain.
///
/// Callers take the first [`TOP_ALBUMS_LIMIT`] entries before fetching album
/// records.
pub fn rank_albums_by_frequency(tracks: &[Track]) -> Vec<AlbumFrequency> {
    rank(tracks.iter().map(|t| t.album.id.clone()))
        .into_iter()
        .map(|(album_id, count)| AlbumFrequency { album_id, count })
        .collect()
}

/// Ids of the artists whose genres make up the genre facet.
///
/// The primary artist of every track followed by every top artist, each id
/// once, in order of first occurrence.
pub fn unique_artist_ids(tracks: &[Track], artists: &[Artist]) -> Vec<String> {
    let mut seen = HashSet::new();

    tracks
        .iter()
        .filter_map(|t| t.artists.first().map(|a| a.id.clone()))
        .chain(artists.iter().map(|a| a.id.clone()))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Ranks the genres shared by `artists`, keeping the top [`TOP_GENRES_LIMIT`].
///
/// `artists` is expected to be deduplicated already (see
/// [`unique_artist_ids`]); an artist listed twice counts twice.
pub fn collect_genres(artists: &[Artist]) -> Vec<GenreFrequency> {
    rank(artists.iter().flat_map(|a| a.genres.iter().cloned()))
        .into_iter()
        .take(TOP_GENRES_LIMIT)
        .map(|(genre, count)| GenreFrequency { genre, count })
        .collect()
}

/// Runs `fetch` for every key concurrently and keeps the successes.
///
/// Results come back in key order. A failed lookup is logged and left out;
/// it never fails the aggregation as a whole. The future resolves only once
/// every lookup has settled.
pub async fn hydrate<K, T, E, F, Fut>(keys: impl IntoIterator<Item = K>, fetch: F) -> Vec<T>
where
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    join_all(keys.into_iter().map(fetch))
        .await
        .into_iter()
        .filter_map(|res| match res {
            Ok(item) => Some(item),
            Err(e) => {
                warning!("Dropping item from aggregation: {}", e);
                None
            }
        })
        .collect()
}
