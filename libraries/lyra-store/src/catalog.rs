//! Catalog read-models
//!
//! Trending, most-liked, search, and genre listings. These are plain
//! filter/sort queries against the song collection; there is no
//! recommendation algorithm behind them.

use crate::collections;
use crate::error::Result;
use crate::store::{Direction, DocumentStore, Filter, Query};
use lyra_core::normalize_song;
use lyra_core::types::Song;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Catalog query service
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn DocumentStore>,
}

impl Catalog {
    /// Create a catalog service over a document store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Songs ordered by play count, highest first
    pub async fn trending(&self, limit: usize) -> Result<Vec<Song>> {
        self.run(Query::all().order_by("plays", Direction::Desc).limit(limit))
            .await
    }

    /// Songs ordered by like count, highest first
    pub async fn most_liked(&self, limit: usize) -> Result<Vec<Song>> {
        self.run(Query::all().order_by("likes", Direction::Desc).limit(limit))
            .await
    }

    /// Newest catalog additions first
    pub async fn recent(&self, limit: usize) -> Result<Vec<Song>> {
        self.run(
            Query::all()
                .order_by("createdAt", Direction::Desc)
                .limit(limit),
        )
        .await
    }

    /// Songs in a genre
    pub async fn by_genre(&self, genre: &str) -> Result<Vec<Song>> {
        self.run(Query::all().filter(Filter::Eq("genre".into(), json!(genre))))
            .await
    }

    /// Case-insensitive substring search over title and artist
    ///
    /// The store has no text index; the filter runs client-side over the
    /// fetched collection. A blank term returns nothing.
    pub async fn search(&self, term: &str) -> Result<Vec<Song>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let songs = self.run(Query::all()).await?;
        Ok(songs
            .into_iter()
            .filter(|song| {
                song.title.to_lowercase().contains(&term)
                    || song.artist.to_lowercase().contains(&term)
            })
            .collect())
    }

    async fn run(&self, query: Query) -> Result<Vec<Song>> {
        let docs = self.store.query(collections::SONGS, query).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| match normalize_song(&doc.id, &doc.data) {
                Ok(song) => Some(song),
                Err(err) => {
                    warn!(id = %doc.id, %err, "skipping malformed song document");
                    None
                }
            })
            .collect())
    }
}
