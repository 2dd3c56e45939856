//! Queue coordinator
//!
//! Single choke point for queue mutation. All mutating operations are
//! serialized through one lock so compound engine sequences (reset, add,
//! skip, play) never interleave, and the queue invariants hold:
//!
//! - track ids are unique within the queue
//! - skip next/previous never wrap around the queue ends
//! - emptying the queue always tears playback down and announces it on
//!   the now-playing channel exactly once
//!
//! Engine failures do not cross this boundary: a failed operation is
//! logged and the operation becomes a no-op from the caller's point of
//! view. Whatever engine calls already succeeded are not rolled back;
//! the next successful operation re-establishes a coherent queue.

use crate::broadcast::NowPlayingBroadcast;
use crate::engine::PlaybackEngine;
use crate::error::Result;
use crate::types::{CoordinatorConfig, EngineState, RepeatMode, Track};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

struct OpState {
    ready: bool,
}

/// Serializes queue mutations against a playback engine
pub struct QueueCoordinator {
    engine: Arc<dyn PlaybackEngine>,
    broadcast: NowPlayingBroadcast,
    config: CoordinatorConfig,
    op: Mutex<OpState>,
}

impl QueueCoordinator {
    pub fn new(engine: Arc<dyn PlaybackEngine>, config: CoordinatorConfig) -> Self {
        Self {
            engine,
            broadcast: NowPlayingBroadcast::new(),
            config,
            op: Mutex::new(OpState { ready: false }),
        }
    }

    /// The now-playing lifecycle channel this coordinator announces on
    pub fn now_playing(&self) -> &NowPlayingBroadcast {
        &self.broadcast
    }

    /// Replace the queue with a single track and play it
    pub async fn play_one(&self, track: Track) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.play_one_inner(&mut op, track).await {
            warn!("play_one failed: {err}");
        }
    }

    async fn play_one_inner(&self, op: &mut OpState, track: Track) -> Result<()> {
        self.ensure_ready(op).await?;
        self.engine.reset().await?;
        self.engine.add(vec![track]).await?;
        self.engine.skip(0).await?;
        self.engine.play().await
    }

    /// Replace the queue with `tracks` and start playing from
    /// `start_index`
    ///
    /// Duplicate track ids are dropped (first occurrence wins). The
    /// start index refers to the original list; it is remapped to the
    /// deduplicated position of the requested track, and clamped to the
    /// last slot if it pointed past the end. An empty list is a no-op.
    pub async fn play_all(&self, tracks: Vec<Track>, start_index: usize) {
        if tracks.is_empty() {
            return;
        }
        let mut op = self.op.lock().await;
        if let Err(err) = self.play_all_inner(&mut op, tracks, start_index).await {
            warn!("play_all failed: {err}");
        }
    }

    async fn play_all_inner(
        &self,
        op: &mut OpState,
        tracks: Vec<Track>,
        start_index: usize,
    ) -> Result<()> {
        let requested = start_index.min(tracks.len() - 1);
        let requested_id = tracks[requested].id.clone();

        let mut deduped: Vec<Track> = Vec::with_capacity(tracks.len());
        for track in tracks {
            if !deduped.iter().any(|t| t.id == track.id) {
                deduped.push(track);
            }
        }
        // The requested track survives dedup by construction.
        let start = deduped
            .iter()
            .position(|t| t.id == requested_id)
            .unwrap_or(0);

        self.ensure_ready(op).await?;
        self.engine.reset().await?;
        self.engine.add(deduped).await?;
        self.engine.skip(start).await?;
        self.engine.play().await
    }

    /// Append a track to the queue without interrupting playback
    ///
    /// Adding a track already in the queue is a no-op. When the queue
    /// was empty, the appended track starts playing.
    pub async fn enqueue(&self, track: Track) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.enqueue_inner(&mut op, track).await {
            warn!("enqueue failed: {err}");
        }
    }

    async fn enqueue_inner(&self, op: &mut OpState, track: Track) -> Result<()> {
        self.ensure_ready(op).await?;
        let queue = self.engine.queue().await?;
        if queue.iter().any(|t| t.id == track.id) {
            debug!(track_id = %track.id, "already queued, skipping enqueue");
            return Ok(());
        }
        let was_empty = queue.is_empty();
        self.engine.add(vec![track]).await?;
        if was_empty {
            self.engine.skip(0).await?;
            self.engine.play().await?;
        }
        Ok(())
    }

    /// Remove a track from the queue by id
    ///
    /// Absent ids are a no-op. Removing the last remaining track is a
    /// full clear: playback stops and the queue-emptied event fires.
    pub async fn remove_by_id(&self, track_id: &str) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.remove_by_id_inner(&mut op, track_id).await {
            warn!("remove_by_id failed: {err}");
        }
    }

    async fn remove_by_id_inner(&self, op: &mut OpState, track_id: &str) -> Result<()> {
        self.ensure_ready(op).await?;
        let queue = self.engine.queue().await?;
        let Some(index) = queue.iter().position(|t| t.id == track_id) else {
            return Ok(());
        };
        if queue.len() == 1 {
            return self.clear_inner().await;
        }
        self.engine.remove(index).await
    }

    /// Clear the queue and stop playback
    ///
    /// The queue-emptied event fires exactly once, after the engine is
    /// fully torn down.
    pub async fn clear_all(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.clear_all_inner(&mut op).await {
            warn!("clear_all failed: {err}");
        }
    }

    async fn clear_all_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        self.clear_inner().await
    }

    async fn clear_inner(&self) -> Result<()> {
        self.engine.reset().await?;
        self.engine.stop().await?;
        self.broadcast.emit_queue_emptied();
        Ok(())
    }

    /// Shuffle the queue and play from the top of the new order
    ///
    /// The shuffled queue is a permutation of the current one; an empty
    /// queue is a no-op.
    pub async fn shuffle(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.shuffle_inner(&mut op).await {
            warn!("shuffle failed: {err}");
        }
    }

    async fn shuffle_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        let mut queue = self.engine.queue().await?;
        if queue.is_empty() {
            return Ok(());
        }
        queue.shuffle(&mut rand::thread_rng());
        self.engine.reset().await?;
        self.engine.add(queue).await?;
        self.engine.skip(0).await?;
        self.engine.play().await
    }

    /// Advance to the next track, never wrapping past the end
    pub async fn skip_next(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.skip_next_inner(&mut op).await {
            warn!("skip_next failed: {err}");
        }
    }

    async fn skip_next_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        let queue_len = self.engine.queue().await?.len();
        let Some(active) = self.engine.active_index().await? else {
            return Ok(());
        };
        if active + 1 >= queue_len {
            return Ok(());
        }
        self.engine.skip_to_next().await
    }

    /// Return to the previous track, never wrapping before the start
    pub async fn skip_previous(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.skip_previous_inner(&mut op).await {
            warn!("skip_previous failed: {err}");
        }
    }

    async fn skip_previous_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        let Some(active) = self.engine.active_index().await? else {
            return Ok(());
        };
        if active == 0 {
            return Ok(());
        }
        self.engine.skip_to_previous().await
    }

    /// Toggle between playing and paused
    ///
    /// Reads the engine state fresh rather than trusting any cached
    /// projection, so a toggle during buffering resolves correctly.
    pub async fn toggle_play_pause(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.toggle_play_pause_inner(&mut op).await {
            warn!("toggle_play_pause failed: {err}");
        }
    }

    async fn toggle_play_pause_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        match self.engine.state().await? {
            EngineState::Playing => self.engine.pause().await,
            _ => self.engine.play().await,
        }
    }

    /// Seek within the active track, seconds
    ///
    /// Ignored when the engine is stopped or not set up, so a stale
    /// scrub gesture cannot resurrect torn-down playback.
    pub async fn seek_to(&self, position: f64) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.seek_to_inner(&mut op, position).await {
            warn!("seek_to failed: {err}");
        }
    }

    async fn seek_to_inner(&self, op: &mut OpState, position: f64) -> Result<()> {
        self.ensure_ready(op).await?;
        if !self.engine.state().await?.is_seekable() {
            return Ok(());
        }
        self.engine.seek_to(position).await
    }

    /// Set the playback volume, clamped to `0.0..=1.0`
    pub async fn set_volume(&self, volume: f32) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.set_volume_inner(&mut op, volume).await {
            warn!("set_volume failed: {err}");
        }
    }

    async fn set_volume_inner(&self, op: &mut OpState, volume: f32) -> Result<()> {
        self.ensure_ready(op).await?;
        self.engine.set_volume(volume.clamp(0.0, 1.0)).await
    }

    /// Toggle between silent and full volume
    ///
    /// Unmute restores the configured full volume, not the level that
    /// was set before muting.
    pub async fn toggle_mute(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.toggle_mute_inner(&mut op).await {
            warn!("toggle_mute failed: {err}");
        }
    }

    async fn toggle_mute_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        let current = self.engine.volume().await?;
        let next = if current > 0.0 {
            0.0
        } else {
            self.config.full_volume
        };
        self.engine.set_volume(next).await
    }

    /// Set the repeat mode
    pub async fn set_repeat(&self, mode: RepeatMode) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.set_repeat_inner(&mut op, mode).await {
            warn!("set_repeat failed: {err}");
        }
    }

    async fn set_repeat_inner(&self, op: &mut OpState, mode: RepeatMode) -> Result<()> {
        self.ensure_ready(op).await?;
        self.engine.set_repeat(mode).await
    }

    /// Advance the repeat mode: off, single track, whole queue
    pub async fn cycle_repeat(&self) {
        let mut op = self.op.lock().await;
        if let Err(err) = self.cycle_repeat_inner(&mut op).await {
            warn!("cycle_repeat failed: {err}");
        }
    }

    async fn cycle_repeat_inner(&self, op: &mut OpState) -> Result<()> {
        self.ensure_ready(op).await?;
        let next = match self.engine.repeat().await? {
            RepeatMode::Off => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Queue,
            RepeatMode::Queue => RepeatMode::Off,
        };
        self.engine.set_repeat(next).await
    }

    /// Set up the engine on first use
    ///
    /// Runs under the operation lock, so concurrent first calls produce
    /// a single setup. A `None` state on an already-ready engine means
    /// the platform tore the player down underneath us; setup runs
    /// again.
    async fn ensure_ready(&self, op: &mut OpState) -> Result<()> {
        if op.ready && self.engine.state().await? != EngineState::None {
            return Ok(());
        }
        self.engine.setup(self.config.options.clone()).await?;
        op.ready = true;
        debug!("playback engine ready");
        Ok(())
    }
}
