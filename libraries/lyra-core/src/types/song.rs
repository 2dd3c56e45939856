/// Song domain type
use crate::types::SongId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A song document from the catalog
///
/// Carries the rich metadata the catalog stores (likes, plays, genre); the
/// playback layer translates this into its own minimal track descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Audio resource locator
    pub audio_url: String,

    /// Cover image locator
    pub image_url: Option<String>,

    /// Duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Genre
    pub genre: Option<String>,

    /// Like counter
    pub likes: i64,

    /// Play counter
    pub plays: i64,

    /// When the song was added to the catalog
    pub created_at: DateTime<Utc>,
}

impl Song {
    /// Create a new song with minimal metadata
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: SongId::generate(),
            title: title.into(),
            artist: artist.into(),
            audio_url: audio_url.into(),
            image_url: None,
            duration_ms: None,
            genre: None,
            likes: 0,
            plays: 0,
            created_at: Utc::now(),
        }
    }

    /// Get the song duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }
}
