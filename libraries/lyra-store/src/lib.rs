//! Lyra Store
//!
//! Document-store contract and library read-models for Lyra.
//!
//! This crate provides:
//! - The [`DocumentStore`] trait: generic CRUD plus live subscriptions over
//!   the hosted document database (`songs`, `playlists`, `users`), with
//!   field-level update verbs (increment, array union/remove, server
//!   timestamp)
//! - [`MemoryStore`]: an in-process implementation used by tests and local
//!   development
//! - Services over the store: [`Library`] (liked songs, play counts),
//!   [`Playlists`] (playlist CRUD), [`Catalog`] (trending, search, genre)
//!
//! The store is a collaborator, not a product: no wire protocol or
//! persistence format is defined here. Write failures surface as errors so
//! the UI can alert the user; the two-write like/unlike sequence is not
//! transactional and a partial failure is reported, not compensated.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod library;
pub mod memory;
pub mod playlists;
pub mod store;

pub use catalog::Catalog;
pub use error::{Result, StoreError};
pub use library::Library;
pub use memory::MemoryStore;
pub use playlists::Playlists;
pub use store::{
    Direction, Document, DocumentStore, DocumentWatch, FieldOp, FieldUpdate, Filter, Query,
};

/// Collection names used by the client
pub mod collections {
    /// Song catalog collection
    pub const SONGS: &str = "songs";
    /// Playlist collection
    pub const PLAYLISTS: &str = "playlists";
    /// User profile collection
    pub const USERS: &str = "users";
}
