/// Playlist domain type
use crate::types::{PlaylistId, SongId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned playlist document
///
/// Song membership is an ordered list of song ids without duplicates; the
/// store layer enforces the no-duplicate rule on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID
    pub owner_id: UserId,

    /// Playlist name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Cover image locator
    pub image_url: Option<String>,

    /// Ordered song membership
    pub songs: Vec<SongId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            owner_id,
            name: name.into(),
            description: None,
            image_url: None,
            songs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a song is already in the playlist
    pub fn contains(&self, song_id: &SongId) -> bool {
        self.songs.contains(song_id)
    }
}
