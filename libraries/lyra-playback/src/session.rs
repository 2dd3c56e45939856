//! Playback session projection
//!
//! [`SessionWatcher`] folds the engine's event stream into a single
//! observable [`PlaybackSession`] value, so every UI surface shares one
//! subscription path instead of each mirroring engine state ad hoc.
//! [`SeekLatch`] suppresses progress updates while the user is dragging
//! a scrub control, and [`NowPlayingVisibility`] decides whether the
//! persistent mini-player bar should show on a given surface.

use crate::broadcast::NowPlayingEvent;
use crate::coordinator::QueueCoordinator;
use crate::engine::{EngineEvent, PlaybackEngine};
use crate::types::{EngineState, RepeatMode, Track};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::warn;

/// Snapshot of the playback session shown to UI surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// The active track, `None` when the queue is empty
    pub active_track: Option<Track>,

    /// Transport state
    pub state: EngineState,

    /// Position in the active track, seconds
    pub position: f64,

    /// Duration of the active track, seconds (0.0 when unknown)
    pub duration: f64,

    /// Playback volume, `0.0..=1.0`
    pub volume: f32,

    /// Repeat mode
    pub repeat: RepeatMode,
}

impl PlaybackSession {
    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            active_track: None,
            state: EngineState::None,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            repeat: RepeatMode::Off,
        }
    }
}

/// Held while the user is dragging a scrub control
///
/// While latched, progress events do not move the observed position, so
/// the thumb stays under the user's finger. [`SeekLatch::complete`]
/// commits the seek and releases.
#[derive(Debug, Clone)]
pub struct SeekLatch {
    seeking: Arc<AtomicBool>,
}

impl SeekLatch {
    /// Start suppressing progress updates
    pub fn begin(&self) {
        self.seeking.store(true, Ordering::SeqCst);
    }

    /// Stop suppressing without seeking
    pub fn release(&self) {
        self.seeking.store(false, Ordering::SeqCst);
    }

    /// Seek to the released position, then resume progress updates
    pub async fn complete(&self, coordinator: &QueueCoordinator, position: f64) {
        coordinator.seek_to(position).await;
        self.release();
    }

    fn is_held(&self) -> bool {
        self.seeking.load(Ordering::SeqCst)
    }
}

/// Maintains the observable [`PlaybackSession`]
pub struct SessionWatcher {
    engine: Arc<dyn PlaybackEngine>,
    tx: watch::Sender<PlaybackSession>,
    seeking: Arc<AtomicBool>,
}

impl SessionWatcher {
    pub fn new(engine: Arc<dyn PlaybackEngine>) -> Self {
        let (tx, _) = watch::channel(PlaybackSession::default());
        Self {
            engine,
            tx,
            seeking: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Observe the session
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSession> {
        self.tx.subscribe()
    }

    /// The latch shared with scrub controls
    pub fn seek_latch(&self) -> SeekLatch {
        SeekLatch {
            seeking: Arc::clone(&self.seeking),
        }
    }

    /// Populate the session from current engine state
    ///
    /// Called once before [`SessionWatcher::run`], so surfaces mounted
    /// mid-playback see the live session instead of the default.
    pub async fn prime(&self) {
        let session = PlaybackSession {
            active_track: self.engine.active_track().await.ok().flatten(),
            state: self
                .engine
                .state()
                .await
                .unwrap_or(EngineState::None),
            position: self.engine.position().await.unwrap_or(0.0),
            duration: self.engine.duration().await.unwrap_or(0.0),
            volume: self.engine.volume().await.unwrap_or(1.0),
            repeat: self.engine.repeat().await.unwrap_or(RepeatMode::Off),
        };
        self.tx.send_replace(session);
    }

    /// Fold engine and now-playing events into the session until both
    /// streams close
    pub async fn run(
        &self,
        mut engine_events: broadcast::Receiver<EngineEvent>,
        mut now_playing: broadcast::Receiver<NowPlayingEvent>,
    ) {
        loop {
            tokio::select! {
                event = engine_events.recv() => match event {
                    Ok(event) => self.apply_engine_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "session watcher lagged behind engine events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                event = now_playing.recv() => match event {
                    Ok(NowPlayingEvent::QueueEmptied) => self.apply_queue_emptied(),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "session watcher lagged behind now-playing events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }

    async fn apply_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::StateChanged { state } => {
                self.tx.send_modify(|session| session.state = state);
            }
            // The payload index can be stale; the engine is the source
            // of truth for which track is active.
            EngineEvent::TrackChanged { .. } => {
                let track = self.engine.active_track().await.ok().flatten();
                let duration = self.engine.duration().await.unwrap_or(0.0);
                self.tx.send_modify(|session| {
                    session.active_track = track;
                    session.position = 0.0;
                    session.duration = duration;
                });
            }
            EngineEvent::RepeatChanged { mode } => {
                self.tx.send_modify(|session| session.repeat = mode);
            }
            EngineEvent::ProgressUpdated { position, duration } => {
                if self.seeking.load(Ordering::SeqCst) {
                    return;
                }
                self.tx.send_modify(|session| {
                    session.position = position;
                    session.duration = duration;
                });
            }
        }
    }

    fn apply_queue_emptied(&self) {
        self.tx.send_modify(|session| {
            session.active_track = None;
            session.state = EngineState::Stopped;
            session.position = 0.0;
            session.duration = 0.0;
        });
    }
}

/// A navigable surface of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Home,
    Browse,
    PlaylistDetail,
    Profile,
    Player,
    QueueList,
}

impl Surface {
    /// Surfaces that render their own transport controls, making the
    /// persistent bar redundant
    fn renders_own_transport(self) -> bool {
        matches!(self, Self::Player | Self::QueueList)
    }
}

/// Decides whether the persistent now-playing bar is shown
///
/// The bar shows on every surface except those rendering their own
/// transport, and only while the queue has content. Derived from
/// navigation plus the queue-emptied signal rather than per-screen
/// bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowPlayingVisibility {
    surface: Surface,
    queue_empty: bool,
}

impl NowPlayingVisibility {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            queue_empty: true,
        }
    }

    /// Whether the bar should be rendered
    pub fn visible(&self) -> bool {
        !self.queue_empty && !self.surface.renders_own_transport()
    }

    /// The user navigated to a different surface
    pub fn navigated(&mut self, surface: Surface) {
        self.surface = surface;
    }

    /// The queue-emptied event fired
    pub fn queue_emptied(&mut self) {
        self.queue_empty = true;
    }

    /// Playback started with a non-empty queue
    pub fn queue_populated(&mut self) {
        self.queue_empty = false;
    }
}
