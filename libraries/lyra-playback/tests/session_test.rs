//! Session watcher integration tests

mod support;

use lyra_playback::{
    CoordinatorConfig, EngineState, PlaybackEngine, PlaybackSession, QueueCoordinator, RepeatMode,
    SessionWatcher,
};
use std::sync::Arc;
use std::time::Duration;
use support::{track, FakeEngine};
use tokio::sync::watch;

struct Harness {
    engine: Arc<FakeEngine>,
    coordinator: QueueCoordinator,
    watcher: Arc<SessionWatcher>,
    session: watch::Receiver<PlaybackSession>,
}

fn harness() -> Harness {
    let engine = Arc::new(FakeEngine::new());
    let coordinator = QueueCoordinator::new(
        Arc::clone(&engine) as Arc<dyn PlaybackEngine>,
        CoordinatorConfig::default(),
    );
    let watcher = Arc::new(SessionWatcher::new(
        Arc::clone(&engine) as Arc<dyn PlaybackEngine>,
    ));
    let session = watcher.subscribe();

    let engine_events = engine.subscribe();
    let now_playing = coordinator.now_playing().subscribe();
    let runner = Arc::clone(&watcher);
    tokio::spawn(async move { runner.run(engine_events, now_playing).await });

    Harness {
        engine,
        coordinator,
        watcher,
        session,
    }
}

async fn wait_for(
    rx: &mut watch::Receiver<PlaybackSession>,
    pred: impl Fn(&PlaybackSession) -> bool,
) -> PlaybackSession {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let session = rx.borrow_and_update().clone();
                if pred(&session) {
                    return session;
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("session never reached expected shape")
}

fn active_id(session: &PlaybackSession) -> Option<&str> {
    session.active_track.as_ref().map(|t| t.id.as_str())
}

#[tokio::test]
async fn session_follows_the_active_track() {
    let mut h = harness();

    h.coordinator.play_one(track("a")).await;
    let session = wait_for(&mut h.session, |s| {
        active_id(s) == Some("a") && s.state == EngineState::Playing
    })
    .await;
    assert_eq!(session.position, 0.0);

    h.coordinator.play_one(track("b")).await;
    wait_for(&mut h.session, |s| active_id(s) == Some("b")).await;
}

#[tokio::test]
async fn queue_emptied_clears_the_session() {
    let mut h = harness();
    h.coordinator.play_one(track("a")).await;
    wait_for(&mut h.session, |s| active_id(s) == Some("a")).await;

    // Reset emits no track-changed event; only the queue-emptied
    // announcement clears the active track.
    h.coordinator.clear_all().await;

    let session = wait_for(&mut h.session, |s| s.active_track.is_none()).await;
    assert_eq!(session.state, EngineState::Stopped);
    assert_eq!(session.position, 0.0);
}

#[tokio::test]
async fn progress_ticks_move_the_position() {
    let mut h = harness();
    h.coordinator.play_one(track("a")).await;
    wait_for(&mut h.session, |s| active_id(s) == Some("a")).await;

    h.engine.emit_progress(12.5, 180.0);

    let session = wait_for(&mut h.session, |s| s.position == 12.5).await;
    assert_eq!(session.duration, 180.0);
}

#[tokio::test]
async fn seek_latch_freezes_position_until_committed() {
    let mut h = harness();
    h.coordinator.play_one(track("a")).await;
    wait_for(&mut h.session, |s| active_id(s) == Some("a")).await;
    h.engine.emit_progress(10.0, 180.0);
    wait_for(&mut h.session, |s| s.position == 10.0).await;

    let latch = h.watcher.seek_latch();
    latch.begin();
    h.engine.emit_progress(11.0, 180.0);
    h.engine.emit_progress(12.0, 180.0);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.session.borrow().position, 10.0);

    latch.complete(&h.coordinator, 95.0).await;
    assert_eq!(h.engine.position().await.unwrap(), 95.0);

    // Updates flow again after the latch releases, and the frozen
    // ticks never landed.
    h.engine.emit_progress(96.0, 180.0);
    let session = wait_for(&mut h.session, |s| s.position == 96.0).await;
    assert_eq!(session.position, 96.0);
}

#[tokio::test]
async fn repeat_changes_reach_the_session() {
    let mut h = harness();
    h.coordinator.play_one(track("a")).await;
    wait_for(&mut h.session, |s| active_id(s) == Some("a")).await;

    h.coordinator.set_repeat(RepeatMode::Track).await;

    wait_for(&mut h.session, |s| s.repeat == RepeatMode::Track).await;
}

#[tokio::test]
async fn prime_reflects_a_session_already_in_flight() {
    let engine = Arc::new(FakeEngine::new());
    let coordinator = QueueCoordinator::new(
        Arc::clone(&engine) as Arc<dyn PlaybackEngine>,
        CoordinatorConfig::default(),
    );
    coordinator.play_one(track("a")).await;

    // Watcher attached after playback began, as when a surface mounts
    // mid-session.
    let watcher = SessionWatcher::new(Arc::clone(&engine) as Arc<dyn PlaybackEngine>);
    watcher.prime().await;

    let session = watcher.subscribe().borrow().clone();
    assert_eq!(active_id(&session), Some("a"));
    assert_eq!(session.state, EngineState::Playing);
}
