//! Lyra Playback
//!
//! Queue coordination and playback-session synchronization for the Lyra
//! client.
//!
//! The audio engine itself is an external collaborator (an asynchronous
//! track player owning the queue, transport, and an event stream). This
//! crate provides everything the app layers on top of it:
//!
//! - [`PlaybackEngine`]: the engine contract (queue ops, transport,
//!   setup, events)
//! - [`QueueCoordinator`]: the single choke point for queue mutation,
//!   enforcing queue invariants (unique track ids, no-wrap skips,
//!   empty-queue teardown) with one mutation in flight at a time
//! - [`NowPlayingBroadcast`]: a typed process-wide "queue emptied" signal,
//!   needed because the engine does not reliably emit a track-changed
//!   event when the queue is reset to empty
//! - [`SessionWatcher`]: a single observable [`PlaybackSession`]
//!   projection over the engine's event stream, so UI surfaces share one
//!   subscription path instead of each mirroring engine state ad hoc
//!
//! # Example
//!
//! ```rust,ignore
//! use lyra_playback::{CoordinatorConfig, QueueCoordinator, Track};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(MyEngine::connect()?);
//! let coordinator = QueueCoordinator::new(engine.clone(), CoordinatorConfig::default());
//!
//! // Play a whole playlist from its second entry
//! coordinator.play_all(tracks, 1).await;
//!
//! // Surfaces observe the session instead of polling the engine
//! let watcher = lyra_playback::SessionWatcher::new(engine);
//! let mut session = watcher.subscribe();
//! ```

#![forbid(unsafe_code)]

pub mod broadcast;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod session;
pub mod types;

pub use broadcast::{NowPlayingBroadcast, NowPlayingEvent};
pub use coordinator::QueueCoordinator;
pub use engine::{EngineEvent, PlaybackEngine};
pub use error::{PlaybackError, Result};
pub use session::{NowPlayingVisibility, PlaybackSession, SeekLatch, SessionWatcher, Surface};
pub use types::{Capability, CoordinatorConfig, EngineOptions, EngineState, RepeatMode, Track};
