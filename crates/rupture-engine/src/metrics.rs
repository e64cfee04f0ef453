//! Counters collected over a run.

use indexmap::IndexMap;
use rupture_core::ClusterId;

/// What a [`Simulator::run`](crate::Simulator::run) did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Simulation time reached.
    pub end_time: f64,
    /// Synchronization points passed.
    pub sync_points: u64,
    /// Steps taken per local cluster, in graph order.
    pub cluster_steps: IndexMap<ClusterId, u64>,
    /// Hook invocations across all events, lifecycle events included.
    pub hooks_fired: u64,
    /// Output frames captured.
    pub frames: u64,
}

impl RunSummary {
    /// Steps taken by all clusters together.
    pub fn total_steps(&self) -> u64 {
        self.cluster_steps.values().sum()
    }
}
