//! Domain types for Lyra

mod ids;
mod playlist;
mod song;
mod user;

pub use ids::{PlaylistId, SongId, UserId};
pub use playlist::Playlist;
pub use song::Song;
pub use user::UserProfile;
