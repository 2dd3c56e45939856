//! Liked songs and play counting
//!
//! The liked-song membership lives on the user profile (`likedSongs` array)
//! with a paired counter on each song document. The two writes are
//! independent: a failure after the first leaves them out of step, and the
//! error is surfaced so the UI can tell the user and offer a retry.

use crate::collections;
use crate::error::Result;
use crate::store::{DocumentStore, DocumentWatch, FieldOp, FieldUpdate, Filter, Query};
use lyra_core::normalize_song;
use lyra_core::types::{Song, SongId, UserId};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Liked-song and play-count service
#[derive(Clone)]
pub struct Library {
    store: Arc<dyn DocumentStore>,
}

impl Library {
    /// Create a library service over a document store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ids of the songs the user has liked, in like order
    pub async fn liked_song_ids(&self, user: &UserId) -> Result<Vec<SongId>> {
        let Some(doc) = self.store.get(collections::USERS, user.as_str()).await? else {
            return Ok(Vec::new());
        };

        Ok(doc
            .data
            .get("likedSongs")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(SongId::new)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Fetch the user's liked songs as full catalog entries
    ///
    /// Songs that fail normalization are skipped with a warning rather than
    /// failing the whole list; a single malformed document should not blank
    /// the screen.
    pub async fn liked_songs(&self, user: &UserId) -> Result<Vec<Song>> {
        let ids = self.liked_song_ids(user).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_strings: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let docs = self
            .store
            .query(
                collections::SONGS,
                Query::all().filter(Filter::IdIn(id_strings)),
            )
            .await?;

        let mut songs: Vec<Song> = docs
            .iter()
            .filter_map(|doc| match normalize_song(&doc.id, &doc.data) {
                Ok(song) => Some(song),
                Err(err) => {
                    warn!(id = %doc.id, %err, "skipping malformed song document");
                    None
                }
            })
            .collect();

        // Preserve like order rather than query order
        songs.sort_by_key(|song| ids.iter().position(|id| *id == song.id));
        Ok(songs)
    }

    /// Whether the user has liked the song
    pub async fn is_liked(&self, user: &UserId, song: &SongId) -> Result<bool> {
        Ok(self.liked_song_ids(user).await?.contains(song))
    }

    /// Toggle liked state, returning the new state
    ///
    /// Two independent writes: membership on the user profile, then the
    /// counter on the song. A partial failure is surfaced, not compensated.
    pub async fn toggle_like(&self, user: &UserId, song: &SongId) -> Result<bool> {
        let liked = self.is_liked(user, song).await?;
        let (membership, delta) = if liked {
            (FieldOp::ArrayRemove(json!(song.as_str())), -1)
        } else {
            (FieldOp::ArrayUnion(json!(song.as_str())), 1)
        };

        self.store
            .update(
                collections::USERS,
                user.as_str(),
                vec![FieldUpdate::new("likedSongs", membership)],
            )
            .await?;

        self.store
            .update(
                collections::SONGS,
                song.as_str(),
                vec![FieldUpdate::new("likes", FieldOp::Increment(delta))],
            )
            .await?;

        debug!(user = %user, song = %song, liked = !liked, "toggled like");
        Ok(!liked)
    }

    /// Record a play on the song's counter
    ///
    /// Callers invoke this before starting playback so the count is not
    /// lost to an engine failure.
    pub async fn record_play(&self, song: &SongId) -> Result<()> {
        self.store
            .update(
                collections::SONGS,
                song.as_str(),
                vec![FieldUpdate::new("plays", FieldOp::Increment(1))],
            )
            .await
    }

    /// Fetch a single song
    pub async fn song(&self, id: &SongId) -> Result<Option<Song>> {
        match self.store.get(collections::SONGS, id.as_str()).await? {
            Some(doc) => Ok(Some(normalize_song(&doc.id, &doc.data)?)),
            None => Ok(None),
        }
    }

    /// Live subscription to a user profile (liked-songs views)
    pub async fn watch_profile(&self, user: &UserId) -> Result<DocumentWatch> {
        self.store.watch(collections::USERS, user.as_str()).await
    }
}
