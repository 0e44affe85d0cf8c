use serde_json::json;
use spotcharts::analysis::*;
use spotcharts::types::{AlbumFrequency, Artist, GenreFrequency, Track};

// Helper function to create a track on `album_id` by `artist_id`
fn track(id: &str, album_id: &str, artist_id: &str) -> Track {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Track {}", id),
        "album": { "id": album_id, "name": format!("Album {}", album_id) },
        "artists": [{ "id": artist_id, "name": format!("Artist {}", artist_id) }]
    }))
    .unwrap()
}

fn artist(id: &str, genres: &[&str]) -> Artist {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Artist {}", id),
        "genres": genres
    }))
    .unwrap()
}

fn album_frequency(album_id: &str, count: usize) -> AlbumFrequency {
    AlbumFrequency {
        album_id: album_id.to_string(),
        count,
    }
}

#[test]
fn test_rank_albums_empty() {
    assert!(rank_albums_by_frequency(&[]).is_empty());
}

#[test]
fn test_rank_albums_single_album() {
    let tracks: Vec<Track> = (0..7)
        .map(|i| track(&format!("t{}", i), "A", "ar"))
        .collect();

    assert_eq!(
        rank_albums_by_frequency(&tracks),
        vec![album_frequency("A", 7)]
    );
}

#[test]
fn test_rank_albums_orders_by_count_then_first_seen() {
    let tracks = vec![
        track("1", "C", "x"),
        track("2", "B", "x"),
        track("3", "A", "x"),
        track("4", "B", "x"),
        track("5", "A", "x"),
        track("6", "D", "x"),
    ];

    assert_eq!(
        rank_albums_by_frequency(&tracks),
        vec![
            album_frequency("B", 2),
            album_frequency("A", 2),
            album_frequency("C", 1),
            album_frequency("D", 1),
        ]
    );
}

#[test]
fn test_unique_artist_ids_keeps_first_occurrence() {
    let tracks = vec![
        track("1", "A", "ar2"),
        track("2", "A", "ar1"),
        track("3", "B", "ar2"),
    ];
    let artists = vec![artist("ar3", &[]), artist("ar1", &[]), artist("ar4", &[])];

    assert_eq!(
        unique_artist_ids(&tracks, &artists),
        vec!["ar2", "ar1", "ar3", "ar4"]
    );
}

#[test]
fn test_unique_artist_ids_uses_primary_artist_only() {
    let track: Track = serde_json::from_value(json!({
        "id": "t",
        "name": "Duet",
        "album": { "id": "A", "name": "Album" },
        "artists": [{ "id": "lead", "name": "Lead" }, { "id": "feat", "name": "Feat" }]
    }))
    .unwrap();

    assert_eq!(unique_artist_ids(&[track], &[]), vec!["lead"]);
    assert!(unique_artist_ids(&[], &[]).is_empty());
}

#[test]
fn test_collect_genres_ranks_shared_genres_first() {
    let artists = vec![artist("a", &["pop", "rock"]), artist("b", &["pop"])];

    let genres = collect_genres(&artists);

    assert_eq!(
        genres,
        vec![
            GenreFrequency {
                genre: "pop".to_string(),
                count: 2
            },
            GenreFrequency {
                genre: "rock".to_string(),
                count: 1
            },
        ]
    );
}

#[test]
fn test_collect_genres_truncates_to_five() {
    let artists = vec![
        artist("a", &["g1", "g2", "g3"]),
        artist("b", &["g4", "g5", "g6"]),
        artist("c", &["g7", "g6"]),
    ];

    let genres: Vec<String> = collect_genres(&artists)
        .into_iter()
        .map(|g| g.genre)
        .collect();

    assert_eq!(genres.len(), TOP_GENRES_LIMIT);
    assert_eq!(genres, vec!["g6", "g1", "g2", "g3", "g4"]);
}

#[test]
fn test_collect_genres_empty() {
    assert!(collect_genres(&[]).is_empty());
    assert!(collect_genres(&[artist("a", &[])]).is_empty());
}

#[tokio::test]
async fn test_hydrate_drops_failed_lookups() {
    let ids = vec!["A".to_string(), "missing".to_string(), "C".to_string()];

    let albums = hydrate(ids, |id| async move {
        if id == "missing" {
            Err(format!("album {} not found", id))
        } else {
            Ok(format!("album {}", id))
        }
    })
    .await;

    assert_eq!(albums, vec!["album A", "album C"]);
}

#[tokio::test]
async fn test_hydrate_empty() {
    let albums: Vec<String> = hydrate(Vec::<String>::new(), |id| async move {
        Ok::<_, String>(id)
    })
    .await;

    assert!(albums.is_empty());
}
