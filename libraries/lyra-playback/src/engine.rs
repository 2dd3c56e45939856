//! Playback engine contract
//!
//! The engine is the platform audio player: it owns the actual queue,
//! the transport, and emits events as playback advances. Everything in
//! this crate drives playback through this trait so the app logic stays
//! testable against an in-process fake.

use crate::error::Result;
use crate::types::{EngineOptions, EngineState, RepeatMode, Track};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Event emitted by the engine as playback advances
///
/// Payloads are advisory. In particular the index carried by
/// [`EngineEvent::TrackChanged`] can be stale by the time a consumer
/// reads it, so consumers re-fetch the active track from the engine
/// rather than trusting the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Transport state changed
    StateChanged { state: EngineState },

    /// A different queue slot became active (`None` when nothing is)
    TrackChanged { index: Option<usize> },

    /// The repeat mode changed
    RepeatChanged { mode: RepeatMode },

    /// Periodic progress tick, seconds
    ProgressUpdated { position: f64, duration: f64 },
}

/// Contract for the underlying audio engine
///
/// All queue indices are zero-based positions in the engine's queue.
/// Implementations must be safe to call from multiple tasks; the
/// coordinator serializes mutations, but reads may happen concurrently.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// One-time setup with remote-control options
    ///
    /// Must be idempotent: calling it on an already set-up engine is a
    /// no-op success.
    async fn setup(&self, options: EngineOptions) -> Result<()>;

    /// Current transport state ([`EngineState::None`] before setup)
    async fn state(&self) -> Result<EngineState>;

    /// Snapshot of the queue in order
    async fn queue(&self) -> Result<Vec<Track>>;

    /// Append tracks to the end of the queue
    async fn add(&self, tracks: Vec<Track>) -> Result<()>;

    /// Remove the track at `index`
    async fn remove(&self, index: usize) -> Result<()>;

    /// Clear the queue
    async fn reset(&self) -> Result<()>;

    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Stop playback
    async fn stop(&self) -> Result<()>;

    /// Make the track at `index` active
    async fn skip(&self, index: usize) -> Result<()>;

    /// Advance to the next queue slot
    async fn skip_to_next(&self) -> Result<()>;

    /// Return to the previous queue slot
    async fn skip_to_previous(&self) -> Result<()>;

    /// Seek within the active track, seconds
    async fn seek_to(&self, position: f64) -> Result<()>;

    /// Set playback volume, `0.0..=1.0`
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Current playback volume
    async fn volume(&self) -> Result<f32>;

    /// Set the repeat mode
    async fn set_repeat(&self, mode: RepeatMode) -> Result<()>;

    /// Current repeat mode
    async fn repeat(&self) -> Result<RepeatMode>;

    /// The currently active track, if any
    async fn active_track(&self) -> Result<Option<Track>>;

    /// Index of the currently active track, if any
    async fn active_index(&self) -> Result<Option<usize>>;

    /// Playback position in the active track, seconds
    async fn position(&self) -> Result<f64>;

    /// Duration of the active track, seconds (0.0 when unknown)
    async fn duration(&self) -> Result<f64>;

    /// Subscribe to the engine's event stream
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}
