//! Core types for playback coordination

use lyra_core::types::Song;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable unit handed to the engine
///
/// Minimal descriptor, distinct from the catalog's [`Song`] document
/// (which carries likes, plays, genre). Created by the coordinator when
/// translating a song into engine input; its `id` matches the song
/// document id and is unique within the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier matching the song document id
    pub id: String,

    /// Audio resource locator
    pub url: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork image locator
    pub artwork: Option<String>,

    /// Track duration
    pub duration: Option<Duration>,
}

impl From<&Song> for Track {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.as_str().to_string(),
            url: song.audio_url.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            artwork: song.image_url.clone(),
            duration: song.duration(),
        }
    }
}

/// Engine-reported playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Engine not set up / nothing loaded
    None,

    /// Set up with a track loaded, not playing
    Ready,

    /// Playing audio
    Playing,

    /// Paused mid-track
    Paused,

    /// Stopped
    Stopped,

    /// Buffering network audio
    Buffering,
}

impl EngineState {
    /// Whether seeking has any effect in this state
    pub fn is_seekable(self) -> bool {
        !matches!(self, Self::None | Self::Stopped)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the current track
    Track,

    /// Loop the entire queue
    Queue,
}

/// Remote-control capability advertised to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Play,
    Pause,
    SkipToNext,
    SkipToPrevious,
    Stop,
}

/// Options handed to the engine on one-time setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Full capability set (lock screen, notification)
    pub capabilities: Vec<Capability>,

    /// Reduced set for compact notification layouts
    pub compact_capabilities: Vec<Capability>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            capabilities: vec![
                Capability::Play,
                Capability::Pause,
                Capability::SkipToNext,
                Capability::SkipToPrevious,
                Capability::Stop,
            ],
            compact_capabilities: vec![Capability::Play, Capability::Pause],
        }
    }
}

/// Configuration for the queue coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Engine setup options
    pub options: EngineOptions,

    /// Volume restored by unmute (fixed-restore policy: the pre-mute
    /// level is deliberately not remembered)
    pub full_volume: f32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            options: EngineOptions::default(),
            full_volume: 1.0,
        }
    }
}
