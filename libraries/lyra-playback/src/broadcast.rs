//! Process-wide now-playing signal
//!
//! The engine does not reliably emit a track-changed event when its
//! queue is reset to empty, so teardown is announced here instead. Every
//! subscriber receives each event exactly once; the channel carries a
//! typed event rather than a string topic so new event kinds are a
//! compile-time concern.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Event announced on the now-playing channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NowPlayingEvent {
    /// The queue was cleared and playback stopped
    QueueEmptied,
}

/// Broadcast channel for now-playing lifecycle events
///
/// Cheap to clone; all clones share the same channel. Subscribers that
/// have been dropped stop receiving, and emitting with no subscribers is
/// not an error.
#[derive(Debug, Clone)]
pub struct NowPlayingBroadcast {
    sender: broadcast::Sender<NowPlayingEvent>,
}

impl NowPlayingBroadcast {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<NowPlayingEvent> {
        self.sender.subscribe()
    }

    /// Announce that the queue was emptied
    pub fn emit_queue_emptied(&self) {
        // Send only fails when there are no receivers, which is fine.
        let _ = self.sender.send(NowPlayingEvent::QueueEmptied);
    }
}

impl Default for NowPlayingBroadcast {
    fn default() -> Self {
        Self::new()
    }
}
