//! Named synchronization events.

use std::fmt;

/// A point in the run at which every rank pauses and hooks may fire.
///
/// The startup events occur once each, in declaration order.
/// [`SynchronizationPoint`](Self::SynchronizationPoint) recurs at every
/// globally agreed simulation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyncEvent {
    /// Before the communication layer is initialised.
    PreMpi,
    /// After the communication layer is initialised.
    PostMpiInit,
    /// Before the mesh is read.
    PreMesh,
    /// After the mesh is read and partitioned.
    PostMesh,
    /// Before the cluster graph is built.
    PreLtsInit,
    /// After the cluster graph is built.
    PostLtsInit,
    /// Before material and fault models are set up.
    PreModel,
    /// After material and fault models are set up.
    PostModel,
    /// Immediately before the first time step.
    SimulationStart,
    /// All clusters have reached a common simulation time.
    SynchronizationPoint,
    /// After the last time step.
    Shutdown,
}

impl SyncEvent {
    /// Stable event name used in logs and desync reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::PreMpi => "pre-mpi",
            Self::PostMpiInit => "post-mpi-init",
            Self::PreMesh => "pre-mesh",
            Self::PostMesh => "post-mesh",
            Self::PreLtsInit => "pre-lts-init",
            Self::PostLtsInit => "post-lts-init",
            Self::PreModel => "pre-model",
            Self::PostModel => "post-model",
            Self::SimulationStart => "simulation-start",
            Self::SynchronizationPoint => "synchronization-point",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
