/// User profile domain type
use crate::types::{PlaylistId, SongId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub display_name: String,

    /// Email address
    pub email: String,

    /// Liked-song membership set (stored as an ordered array)
    pub liked_songs: Vec<SongId>,

    /// Playlists owned by this user
    pub playlists: Vec<PlaylistId>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new user profile
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            display_name: display_name.into(),
            email: email.into(),
            liked_songs: Vec::new(),
            playlists: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check whether the user has liked a song
    pub fn has_liked(&self, song_id: &SongId) -> bool {
        self.liked_songs.contains(song_id)
    }
}
