//! Property tests: FIFO firing and one-shot semantics.

use proptest::prelude::*;
use rupture_sync::{Hook, HookCall, SingleRank, SyncEvent, SyncRegistry};

proptest! {
    #[test]
    fn firing_follows_registration_order(
        one_shot in prop::collection::vec(any::<bool>(), 1..12),
        passes in 1usize..5,
    ) {
        let mut registry: SyncRegistry<Vec<usize>> = SyncRegistry::new();
        for (i, &once) in one_shot.iter().enumerate() {
            let hook = Hook::new(
                SyncEvent::SynchronizationPoint,
                format!("h{i}"),
                move |call: &mut HookCall<'_, Vec<usize>>| {
                    call.context().push(i);
                    Ok(())
                },
            );
            registry
                .register(if once { hook.one_shot() } else { hook })
                .unwrap();
        }

        let mut log = Vec::new();
        for pass in 0..passes {
            log.clear();
            registry
                .fire(SyncEvent::SynchronizationPoint, pass as f64, &mut log, &mut SingleRank)
                .unwrap();
            let expected: Vec<usize> = one_shot
                .iter()
                .enumerate()
                .filter(|&(_, &once)| pass == 0 || !once)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(&log, &expected);
        }
    }
}
