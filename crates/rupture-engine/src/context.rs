//! State shared with synchronization hooks.

use indexmap::IndexMap;
use rupture_core::{ClusterId, OperatorRecompute, ParameterStore, RuptureError};
use rupture_friction::FaultStorage;
use rupture_lts::ClusterGraph;
use rupture_mirror::MirrorTarget;

/// Mutable simulation state handed to every hook.
///
/// Hooks may rescale clusters and materials between synchronization
/// points; the driver reads step sizes afresh after every firing.
pub struct SimulationContext {
    pub(crate) clusters: ClusterGraph,
    pub(crate) materials: Box<dyn ParameterStore + Send>,
    pub(crate) operators: Box<dyn OperatorRecompute + Send>,
    pub(crate) faults: IndexMap<ClusterId, FaultStorage>,
    pub(crate) time: f64,
}

impl SimulationContext {
    /// Current simulation time: the last synchronization point reached.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The cluster graph.
    pub fn clusters(&self) -> &ClusterGraph {
        &self.clusters
    }

    /// Material data of this rank.
    pub fn materials(&self) -> &dyn ParameterStore {
        self.materials.as_ref()
    }

    /// Fault storage of `cluster`, if it carries fault faces.
    pub fn fault(&self, cluster: ClusterId) -> Option<&FaultStorage> {
        self.faults.get(&cluster)
    }

    /// Mutable fault storage of `cluster`.
    pub fn fault_mut(&mut self, cluster: ClusterId) -> Option<&mut FaultStorage> {
        self.faults.get_mut(&cluster)
    }

    /// Every fault storage, keyed by cluster.
    pub fn faults(&self) -> &IndexMap<ClusterId, FaultStorage> {
        &self.faults
    }
}

impl MirrorTarget for SimulationContext {
    fn clusters_mut(&mut self) -> &mut ClusterGraph {
        &mut self.clusters
    }

    fn materials_mut(&mut self) -> &mut dyn ParameterStore {
        self.materials.as_mut()
    }

    fn recompute_operators(&mut self, affected: &[usize]) -> Result<(), RuptureError> {
        self.operators
            .recompute_local_operators(self.materials.as_ref(), affected)
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("time", &self.time)
            .field("clusters", &self.clusters)
            .field("local_cells", &self.materials.local_cell_count())
            .field("faults", &self.faults.keys().collect::<Vec<_>>())
            .finish()
    }
}
