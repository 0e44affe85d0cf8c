use rand::{Rng, distr::Alphanumeric};

use crate::types::{
    Album, AlbumDetails, AlbumSummary, Artist, ArtistDetails, Image, Song, Track, TrackDetails,
};

pub const STATE_LENGTH: usize = 16;

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Year part of a Spotify release date (`1999`, `1999-03` or `1999-03-14`).
pub fn release_year(release_date: &str) -> String {
    release_date
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn first_image_url(images: &[Image]) -> Option<String> {
    images.first().map(|image| image.url.clone())
}

/// Renders a duration as whole minutes and remaining whole seconds, unpadded.
pub fn format_total_duration(total_ms: u64) -> String {
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    format!("{}:{}", minutes, seconds)
}

pub fn track_details(track: &Track) -> TrackDetails {
    let release_year = release_year(&track.album.release_date);

    TrackDetails {
        id: track.id.clone(),
        name: track.name.clone(),
        profile_image: first_image_url(&track.album.images),
        duration: track.duration_ms,
        release_year: release_year.clone(),
        artists: track.artists.iter().map(|a| a.name.clone()).collect(),
        album: AlbumSummary {
            name: track.album.name.clone(),
            release_year,
        },
    }
}

pub fn album_details(album: &Album) -> AlbumDetails {
    let total_ms = album.tracks.items.iter().map(|t| t.duration_ms).sum();

    AlbumDetails {
        id: album.id.clone(),
        name: album.name.clone(),
        profile_image: first_image_url(&album.images),
        release_year: release_year(&album.release_date),
        artists: album.artists.iter().map(|a| a.name.clone()).collect(),
        total_duration: format_total_duration(total_ms),
        songs: album
            .tracks
            .items
            .iter()
            .map(|t| Song {
                id: t.id.clone(),
                name: t.name.clone(),
                duration: t.duration_ms,
            })
            .collect(),
    }
}

pub fn artist_details(
    artist: &Artist,
    top_tracks: Vec<serde_json::Value>,
    albums: Vec<serde_json::Value>,
) -> ArtistDetails {
    ArtistDetails {
        id: artist.id.clone(),
        name: artist.name.clone(),
        profile_image: first_image_url(&artist.images),
        followers: artist.followers.as_ref().map(|f| f.total).unwrap_or(0),
        top_tracks,
        albums,
    }
}
