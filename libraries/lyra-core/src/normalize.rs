//! Shared document normalization
//!
//! Raw documents come out of the store as loose JSON: optional fields are
//! simply absent, counters may be missing on old documents, and timestamps
//! appear either as epoch seconds or as `{seconds, nanoseconds}` maps
//! depending on which client wrote them. Every read-model goes through the
//! two functions here instead of re-implementing that handling per screen.

use crate::error::{CoreError, Result};
use crate::types::{Playlist, PlaylistId, Song, SongId, UserId};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Decode a raw `songs` document into a [`Song`]
///
/// Required fields: `title`, `artist`, `audioUrl`. Counters default to 0,
/// optional metadata to `None`, and a missing `createdAt` to the epoch.
pub fn normalize_song(id: &str, doc: &Value) -> Result<Song> {
    let title = require_str(doc, "title", "song", id)?;
    let artist = require_str(doc, "artist", "song", id)?;
    let audio_url = require_str(doc, "audioUrl", "song", id)?;

    Ok(Song {
        id: SongId::new(id),
        title,
        artist,
        audio_url,
        image_url: opt_str(doc, "imageUrl"),
        duration_ms: opt_u64(doc, "durationMs"),
        genre: opt_str(doc, "genre"),
        likes: opt_i64(doc, "likes").unwrap_or(0),
        plays: opt_i64(doc, "plays").unwrap_or(0),
        created_at: timestamp(doc.get("createdAt")),
    })
}

/// Decode a raw `playlists` document into a [`Playlist`]
///
/// Required fields: `name`, `ownerId`. A missing `songs` array means an
/// empty playlist; `updatedAt` falls back to `createdAt`.
pub fn normalize_playlist(id: &str, doc: &Value) -> Result<Playlist> {
    let name = require_str(doc, "name", "playlist", id)?;
    let owner_id = require_str(doc, "ownerId", "playlist", id)?;

    let songs = doc
        .get("songs")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(SongId::new)
                .collect()
        })
        .unwrap_or_default();

    let created_at = timestamp(doc.get("createdAt"));
    let updated_at = doc
        .get("updatedAt")
        .map(|v| timestamp(Some(v)))
        .unwrap_or(created_at);

    Ok(Playlist {
        id: PlaylistId::new(id),
        owner_id: UserId::new(owner_id),
        name,
        description: opt_str(doc, "description"),
        image_url: opt_str(doc, "imageUrl"),
        songs,
        created_at,
        updated_at,
    })
}

fn require_str(doc: &Value, field: &str, entity: &'static str, id: &str) -> Result<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CoreError::invalid(entity, id, format!("missing field `{field}`")))
}

fn opt_str(doc: &Value, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

fn opt_i64(doc: &Value, field: &str) -> Option<i64> {
    doc.get(field).and_then(Value::as_i64)
}

fn opt_u64(doc: &Value, field: &str) -> Option<u64> {
    doc.get(field).and_then(Value::as_u64)
}

/// Decode a document timestamp
///
/// Accepts epoch seconds, `{seconds, nanoseconds}` maps, or RFC 3339
/// strings. Anything else decodes as the epoch.
fn timestamp(value: Option<&Value>) -> DateTime<Utc> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_default(),
        Some(Value::Object(map)) => {
            let secs = map.get("seconds").and_then(Value::as_i64).unwrap_or(0);
            let nanos = map.get("nanoseconds").and_then(Value::as_u64).unwrap_or(0) as u32;
            Utc.timestamp_opt(secs, nanos).single().unwrap_or_default()
        }
        Some(Value::String(s)) => s
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
        _ => DateTime::<Utc>::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_song_with_all_fields() {
        let doc = json!({
            "title": "Midnight Drive",
            "artist": "Nova Lane",
            "audioUrl": "https://cdn/a.mp3",
            "imageUrl": "https://cdn/a.jpg",
            "durationMs": 183000,
            "genre": "synthwave",
            "likes": 12,
            "plays": 340,
            "createdAt": { "seconds": 1700000000, "nanoseconds": 0 }
        });

        let song = normalize_song("s1", &doc).unwrap();
        assert_eq!(song.id.as_str(), "s1");
        assert_eq!(song.title, "Midnight Drive");
        assert_eq!(song.likes, 12);
        assert_eq!(song.plays, 340);
        assert_eq!(song.duration_ms, Some(183000));
        assert_eq!(song.created_at.timestamp(), 1700000000);
    }

    #[test]
    fn normalize_song_defaults_counters() {
        let doc = json!({
            "title": "T",
            "artist": "A",
            "audioUrl": "https://cdn/t.mp3"
        });

        let song = normalize_song("s2", &doc).unwrap();
        assert_eq!(song.likes, 0);
        assert_eq!(song.plays, 0);
        assert!(song.image_url.is_none());
    }

    #[test]
    fn normalize_song_rejects_missing_audio_url() {
        let doc = json!({ "title": "T", "artist": "A" });
        let err = normalize_song("s3", &doc).unwrap_err();
        assert!(err.to_string().contains("audioUrl"));
    }

    #[test]
    fn normalize_playlist_missing_songs_is_empty() {
        let doc = json!({ "name": "Focus", "ownerId": "u1" });
        let playlist = normalize_playlist("p1", &doc).unwrap();
        assert!(playlist.songs.is_empty());
        assert_eq!(playlist.owner_id.as_str(), "u1");
    }

    #[test]
    fn normalize_playlist_keeps_song_order() {
        let doc = json!({
            "name": "Focus",
            "ownerId": "u1",
            "songs": ["s3", "s1", "s2"],
            "createdAt": 1700000000
        });

        let playlist = normalize_playlist("p1", &doc).unwrap();
        let ids: Vec<&str> = playlist.songs.iter().map(SongId::as_str).collect();
        assert_eq!(ids, vec!["s3", "s1", "s2"]);
        assert_eq!(playlist.updated_at, playlist.created_at);
    }

    #[test]
    fn timestamp_shapes_decode() {
        assert_eq!(timestamp(Some(&json!(1700000000))).timestamp(), 1700000000);
        assert_eq!(
            timestamp(Some(&json!({"seconds": 1700000000, "nanoseconds": 5}))).timestamp(),
            1700000000
        );
        assert_eq!(timestamp(None).timestamp(), 0);
    }
}
