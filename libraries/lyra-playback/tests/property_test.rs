//! Property tests for queue invariants

mod support;

use lyra_playback::{CoordinatorConfig, PlaybackEngine, QueueCoordinator};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use support::{track, FakeEngine};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
enum Op {
    PlayAll(Vec<u8>, usize),
    Enqueue(u8),
    Remove(u8),
    Shuffle,
    ClearAll,
    SkipNext,
    SkipPrevious,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (proptest::collection::vec(0u8..12, 0..8), 0usize..10)
            .prop_map(|(ids, start)| Op::PlayAll(ids, start)),
        (0u8..12).prop_map(Op::Enqueue),
        (0u8..12).prop_map(Op::Remove),
        Just(Op::Shuffle),
        Just(Op::ClearAll),
        Just(Op::SkipNext),
        Just(Op::SkipPrevious),
    ]
}

async fn apply(coordinator: &QueueCoordinator, op: Op) {
    match op {
        Op::PlayAll(ids, start) => {
            let tracks = ids.iter().map(|i| track(&format!("t{i}"))).collect();
            coordinator.play_all(tracks, start).await;
        }
        Op::Enqueue(id) => coordinator.enqueue(track(&format!("t{id}"))).await,
        Op::Remove(id) => coordinator.remove_by_id(&format!("t{id}")).await,
        Op::Shuffle => coordinator.shuffle().await,
        Op::ClearAll => coordinator.clear_all().await,
        Op::SkipNext => coordinator.skip_next().await,
        Op::SkipPrevious => coordinator.skip_previous().await,
    }
}

proptest! {
    /// No operation sequence can introduce a duplicate track id or
    /// leave the active index pointing outside the queue.
    #[test]
    fn queue_invariants_hold_under_any_op_sequence(
        ops in proptest::collection::vec(op_strategy(), 1..24)
    ) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async move {
            let engine = Arc::new(FakeEngine::new());
            let coordinator = QueueCoordinator::new(
                Arc::clone(&engine) as Arc<dyn PlaybackEngine>,
                CoordinatorConfig::default(),
            );

            for op in ops {
                apply(&coordinator, op).await;

                let ids = engine.queue_ids();
                let unique: HashSet<&String> = ids.iter().collect();
                prop_assert_eq!(unique.len(), ids.len());

                if let Some(active) = engine.active_index().await.unwrap() {
                    prop_assert!(active < ids.len());
                }
            }
            Ok(())
        })?;
    }

    /// Shuffling never drops, duplicates, or invents a track.
    #[test]
    fn shuffle_is_a_permutation(count in 1usize..16) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async move {
            let engine = Arc::new(FakeEngine::new());
            let coordinator = QueueCoordinator::new(
                Arc::clone(&engine) as Arc<dyn PlaybackEngine>,
                CoordinatorConfig::default(),
            );

            let tracks: Vec<_> = (0..count).map(|i| track(&format!("t{i}"))).collect();
            let mut expected: Vec<_> = tracks.iter().map(|t| t.id.clone()).collect();
            coordinator.play_all(tracks, 0).await;

            coordinator.shuffle().await;

            let mut shuffled = engine.queue_ids();
            shuffled.sort();
            expected.sort();
            prop_assert_eq!(shuffled, expected);
            prop_assert_eq!(engine.active_index().await.unwrap(), Some(0));
            Ok(())
        })?;
    }
}
