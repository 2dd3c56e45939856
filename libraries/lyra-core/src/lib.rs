//! Lyra Core
//!
//! Domain types, typed ids, and document normalization for the Lyra
//! music-streaming client.
//!
//! This crate defines:
//! - **Documents**: `Song`, `Playlist`, `UserProfile` as stored in the
//!   hosted document store
//! - **Ids**: string-based typed identifiers
//! - **Normalization**: shared raw-document decoding used by every
//!   read-model, so field and timestamp handling exists in exactly one place
//!
//! # Example
//!
//! ```rust
//! use lyra_core::types::{Song, SongId, UserProfile};
//!
//! let song = Song::new("Midnight Drive", "Nova Lane", "https://cdn.example.com/a.mp3");
//! assert_eq!(song.plays, 0);
//!
//! let user = UserProfile::new("Alice", "alice@example.com");
//! assert!(user.liked_songs.is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod normalize;
pub mod types;

pub use error::{CoreError, Result};
pub use normalize::{normalize_playlist, normalize_song};
pub use types::{Playlist, PlaylistId, Song, SongId, UserId, UserProfile};
