//! Playlist CRUD
//!
//! Playlists are documents owning an ordered `songs` array; the owning user
//! profile carries the playlist id in its `playlists` array. Creating and
//! deleting a playlist are therefore two-write sequences with the same
//! non-transactional caveat as liking (see crate docs).

use crate::collections;
use crate::error::{Result, StoreError};
use crate::store::{DocumentStore, DocumentWatch, FieldOp, FieldUpdate};
use lyra_core::normalize_playlist;
use lyra_core::types::{Playlist, PlaylistId, SongId, UserId};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Playlist service
#[derive(Clone)]
pub struct Playlists {
    store: Arc<dyn DocumentStore>,
}

impl Playlists {
    /// Create a playlist service over a document store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a new playlist owned by `owner`
    pub async fn create(
        &self,
        owner: &UserId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Playlist> {
        let mut playlist = Playlist::new(owner.clone(), name);
        playlist.description = description;

        self.store
            .set(
                collections::PLAYLISTS,
                playlist.id.as_str(),
                playlist_doc(&playlist),
            )
            .await?;

        self.store
            .update(
                collections::USERS,
                owner.as_str(),
                vec![FieldUpdate::new(
                    "playlists",
                    FieldOp::ArrayUnion(json!(playlist.id.as_str())),
                )],
            )
            .await?;

        debug!(playlist = %playlist.id, owner = %owner, "created playlist");
        Ok(playlist)
    }

    /// Fetch a playlist
    pub async fn get(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        match self.store.get(collections::PLAYLISTS, id.as_str()).await? {
            Some(doc) => Ok(Some(normalize_playlist(&doc.id, &doc.data)?)),
            None => Ok(None),
        }
    }

    /// Fetch every playlist a user owns
    ///
    /// Stale ids on the profile (playlist deleted elsewhere) are skipped.
    pub async fn for_user(&self, user: &UserId) -> Result<Vec<Playlist>> {
        let Some(profile) = self.store.get(collections::USERS, user.as_str()).await? else {
            return Ok(Vec::new());
        };

        let ids: Vec<String> = profile
            .data
            .get("playlists")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut playlists = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(&PlaylistId::new(&id)).await {
                Ok(Some(playlist)) => playlists.push(playlist),
                Ok(None) => warn!(playlist = %id, "profile references missing playlist"),
                Err(err) => warn!(playlist = %id, %err, "skipping malformed playlist"),
            }
        }
        Ok(playlists)
    }

    /// Add a song to a playlist
    ///
    /// Returns `Ok(false)` without writing when the song is already present.
    pub async fn add_song(&self, playlist: &PlaylistId, song: &SongId) -> Result<bool> {
        let existing = self
            .get(playlist)
            .await?
            .ok_or_else(|| StoreError::not_found(collections::PLAYLISTS, playlist.as_str()))?;

        if existing.contains(song) {
            return Ok(false);
        }

        self.store
            .update(
                collections::PLAYLISTS,
                playlist.as_str(),
                vec![
                    FieldUpdate::new("songs", FieldOp::ArrayUnion(json!(song.as_str()))),
                    FieldUpdate::new("updatedAt", FieldOp::ServerTimestamp),
                ],
            )
            .await?;
        Ok(true)
    }

    /// Remove a song from a playlist (absent song is a no-op)
    pub async fn remove_song(&self, playlist: &PlaylistId, song: &SongId) -> Result<()> {
        self.store
            .update(
                collections::PLAYLISTS,
                playlist.as_str(),
                vec![
                    FieldUpdate::new("songs", FieldOp::ArrayRemove(json!(song.as_str()))),
                    FieldUpdate::new("updatedAt", FieldOp::ServerTimestamp),
                ],
            )
            .await
    }

    /// Rename a playlist
    pub async fn rename(&self, playlist: &PlaylistId, name: impl Into<String>) -> Result<()> {
        self.store
            .update(
                collections::PLAYLISTS,
                playlist.as_str(),
                vec![
                    FieldUpdate::new("name", FieldOp::Set(json!(name.into()))),
                    FieldUpdate::new("updatedAt", FieldOp::ServerTimestamp),
                ],
            )
            .await
    }

    /// Delete a playlist and unlink it from its owner's profile
    pub async fn delete(&self, playlist: &PlaylistId) -> Result<()> {
        let owner = self
            .get(playlist)
            .await?
            .map(|p| p.owner_id);

        self.store
            .delete(collections::PLAYLISTS, playlist.as_str())
            .await?;

        if let Some(owner) = owner {
            self.store
                .update(
                    collections::USERS,
                    owner.as_str(),
                    vec![FieldUpdate::new(
                        "playlists",
                        FieldOp::ArrayRemove(json!(playlist.as_str())),
                    )],
                )
                .await?;
        }
        Ok(())
    }

    /// Live subscription to a playlist (playlist-detail views)
    pub async fn watch(&self, playlist: &PlaylistId) -> Result<DocumentWatch> {
        self.store
            .watch(collections::PLAYLISTS, playlist.as_str())
            .await
    }
}

/// Encode a playlist into its store document shape
fn playlist_doc(playlist: &Playlist) -> Value {
    json!({
        "name": playlist.name,
        "ownerId": playlist.owner_id.as_str(),
        "description": playlist.description,
        "imageUrl": playlist.image_url,
        "songs": playlist.songs.iter().map(SongId::as_str).collect::<Vec<_>>(),
        "createdAt": playlist.created_at.timestamp(),
        "updatedAt": playlist.updated_at.timestamp(),
    })
}
