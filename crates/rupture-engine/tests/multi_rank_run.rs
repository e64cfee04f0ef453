//! Several in-process ranks running the same simulation.

use std::thread;

use rupture_core::{CollectiveDesyncFault, Rank, RuptureError};
use rupture_engine::{RunSummary, Simulator};
use rupture_sync::{ChannelCollective, Collective};
use rupture_test_utils::fixtures::ConfigBuilder;

fn on_ranks<T, F>(size: usize, body: F) -> Vec<T>
where
    T: Send,
    F: Fn(ChannelCollective) -> T + Sync,
{
    let body = &body;
    thread::scope(|s| {
        let handles: Vec<_> = ChannelCollective::group(size)
            .into_iter()
            .map(|collective| s.spawn(move || body(collective)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn ranks_with_the_same_mirror_agree() {
    let summaries: Vec<RunSummary> = on_ranks(3, |collective| {
        let mut sim = Simulator::new(
            ConfigBuilder::new()
                .mirror(2.0, 0.5, 0.25)
                .collective(collective)
                .build(),
        )
        .unwrap();
        sim.run().unwrap()
    });
    assert!(summaries.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(summaries[0].sync_points, 3);
    assert_eq!(summaries[0].hooks_fired, 2);
}

#[test]
fn rank_without_mirror_is_a_desync() {
    let results: Vec<Result<RunSummary, RuptureError>> = on_ranks(2, |collective| {
        let rank = collective.rank();
        let mut builder = ConfigBuilder::new().collective(collective);
        if rank == Rank(0) {
            builder = builder.mirror(2.0, 0.5, 0.25);
        }
        Simulator::new(builder.build())?.run()
    });
    for result in results {
        match result {
            Err(RuptureError::Desync(
                CollectiveDesyncFault::TimeMismatch { .. }
                | CollectiveDesyncFault::HookSetMismatch { .. }
                | CollectiveDesyncFault::PeerDisconnected { .. },
            )) => {}
            other => panic!("expected a desync fault, got {other:?}"),
        }
    }
}
