//! In-process fake engine for integration tests

// Not every test binary exercises every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use lyra_playback::{
    EngineEvent, EngineOptions, EngineState, PlaybackEngine, RepeatMode, Result, Track,
};
use lyra_playback::PlaybackError;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Build a minimal track for queue tests
pub fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        url: format!("https://cdn.test/{id}.mp3"),
        title: format!("Track {id}"),
        artist: "Test Artist".to_string(),
        artwork: None,
        duration: None,
    }
}

#[derive(Default)]
struct EngineInner {
    set_up: bool,
    state: Option<EngineState>,
    queue: Vec<Track>,
    active: Option<usize>,
    position: f64,
    volume: f32,
    repeat: RepeatMode,
    fail_ops: Vec<String>,
    calls: Vec<String>,
}

/// Scriptable fake of the platform audio player
///
/// Mirrors the quirk the real engine has: `reset` does not emit a
/// track-changed event even though the active track just vanished.
pub struct FakeEngine {
    inner: Mutex<EngineInner>,
    events: broadcast::Sender<EngineEvent>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEngine {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(EngineInner {
                volume: 1.0,
                ..EngineInner::default()
            }),
            events,
        }
    }

    /// Make the next call to `op` fail
    pub fn fail_once(&self, op: &str) {
        self.inner.lock().unwrap().fail_ops.push(op.to_string());
    }

    /// Names of every engine call made, in order
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Ids of the queued tracks, in order
    pub fn queue_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .queue
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn was_set_up(&self) -> bool {
        self.inner.lock().unwrap().set_up
    }

    /// Emit a progress tick as the platform player would
    pub fn emit_progress(&self, position: f64, duration: f64) {
        self.inner.lock().unwrap().position = position;
        let _ = self
            .events
            .send(EngineEvent::ProgressUpdated { position, duration });
    }

    fn record(&self, op: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(op.to_string());
        if let Some(pos) = inner.fail_ops.iter().position(|f| f == op) {
            inner.fail_ops.remove(pos);
            return Err(PlaybackError::engine(format!("injected {op} failure")));
        }
        Ok(())
    }

    fn set_state(&self, state: EngineState) {
        self.inner.lock().unwrap().state = Some(state);
        let _ = self.events.send(EngineEvent::StateChanged { state });
    }

    fn emit_track_changed(&self) {
        let index = self.inner.lock().unwrap().active;
        let _ = self.events.send(EngineEvent::TrackChanged { index });
    }
}

#[async_trait]
impl PlaybackEngine for FakeEngine {
    async fn setup(&self, _options: EngineOptions) -> Result<()> {
        self.record("setup")?;
        let mut inner = self.inner.lock().unwrap();
        if !inner.set_up {
            inner.set_up = true;
            inner.state = Some(EngineState::Ready);
        }
        Ok(())
    }

    async fn state(&self) -> Result<EngineState> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .state
            .unwrap_or(EngineState::None))
    }

    async fn queue(&self) -> Result<Vec<Track>> {
        self.record("queue")?;
        Ok(self.inner.lock().unwrap().queue.clone())
    }

    async fn add(&self, tracks: Vec<Track>) -> Result<()> {
        self.record("add")?;
        self.inner.lock().unwrap().queue.extend(tracks);
        Ok(())
    }

    async fn remove(&self, index: usize) -> Result<()> {
        self.record("remove")?;
        let changed_active = {
            let mut inner = self.inner.lock().unwrap();
            if index >= inner.queue.len() {
                return Err(PlaybackError::IndexOutOfBounds(index));
            }
            inner.queue.remove(index);
            match inner.active {
                Some(active) if index < active => {
                    inner.active = Some(active - 1);
                    false
                }
                Some(active) if index == active => {
                    if inner.queue.is_empty() {
                        inner.active = None;
                    } else if active >= inner.queue.len() {
                        inner.active = Some(inner.queue.len() - 1);
                    }
                    true
                }
                _ => false,
            }
        };
        if changed_active {
            self.emit_track_changed();
        }
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        self.record("reset")?;
        let mut inner = self.inner.lock().unwrap();
        inner.queue.clear();
        inner.active = None;
        inner.position = 0.0;
        // Deliberately no track-changed event here.
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.record("play")?;
        self.set_state(EngineState::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record("pause")?;
        self.set_state(EngineState::Paused);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.record("stop")?;
        self.set_state(EngineState::Stopped);
        Ok(())
    }

    async fn skip(&self, index: usize) -> Result<()> {
        self.record("skip")?;
        {
            let mut inner = self.inner.lock().unwrap();
            if index >= inner.queue.len() {
                return Err(PlaybackError::IndexOutOfBounds(index));
            }
            inner.active = Some(index);
            inner.position = 0.0;
        }
        self.emit_track_changed();
        Ok(())
    }

    async fn skip_to_next(&self) -> Result<()> {
        self.record("skip_to_next")?;
        {
            let mut inner = self.inner.lock().unwrap();
            let Some(active) = inner.active else {
                return Err(PlaybackError::NotReady);
            };
            if active + 1 >= inner.queue.len() {
                return Err(PlaybackError::IndexOutOfBounds(active + 1));
            }
            inner.active = Some(active + 1);
            inner.position = 0.0;
        }
        self.emit_track_changed();
        Ok(())
    }

    async fn skip_to_previous(&self) -> Result<()> {
        self.record("skip_to_previous")?;
        {
            let mut inner = self.inner.lock().unwrap();
            let Some(active) = inner.active else {
                return Err(PlaybackError::NotReady);
            };
            if active == 0 {
                return Err(PlaybackError::IndexOutOfBounds(0));
            }
            inner.active = Some(active - 1);
            inner.position = 0.0;
        }
        self.emit_track_changed();
        Ok(())
    }

    async fn seek_to(&self, position: f64) -> Result<()> {
        self.record("seek_to")?;
        self.inner.lock().unwrap().position = position;
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.record("set_volume")?;
        self.inner.lock().unwrap().volume = volume;
        Ok(())
    }

    async fn volume(&self) -> Result<f32> {
        Ok(self.inner.lock().unwrap().volume)
    }

    async fn set_repeat(&self, mode: RepeatMode) -> Result<()> {
        self.record("set_repeat")?;
        self.inner.lock().unwrap().repeat = mode;
        let _ = self.events.send(EngineEvent::RepeatChanged { mode });
        Ok(())
    }

    async fn repeat(&self) -> Result<RepeatMode> {
        Ok(self.inner.lock().unwrap().repeat)
    }

    async fn active_track(&self) -> Result<Option<Track>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.active.and_then(|i| inner.queue.get(i).cloned()))
    }

    async fn active_index(&self) -> Result<Option<usize>> {
        Ok(self.inner.lock().unwrap().active)
    }

    async fn position(&self) -> Result<f64> {
        Ok(self.inner.lock().unwrap().position)
    }

    async fn duration(&self) -> Result<f64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .active
            .and_then(|i| inner.queue.get(i))
            .and_then(|t| t.duration)
            .map_or(0.0, |d| d.as_secs_f64()))
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}
