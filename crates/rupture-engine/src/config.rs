//! Everything needed to construct a [`Simulator`](crate::Simulator).

use indexmap::IndexMap;
use rupture_config::{SimulationParameters, TimeSteppingConfig};
use rupture_core::{
    ClusterId, ConfigurationError, ConsistencyFault, OperatorRecompute, ParameterStore,
    RuptureError,
};
use rupture_lts::ClusterGraph;
use rupture_sync::{Collective, Hook};

use crate::context::SimulationContext;
use crate::stepper::ClusterStepper;

// ── Cluster ladder ─────────────────────────────────────────────────

/// Build the local cluster ladder from the time-stepping section.
///
/// `stable_step` is the largest step of the finest cluster at CFL number
/// one. The finest cluster steps with `cfl * stable_step`, capped at
/// `max_timestep`; every coarser cluster multiplies by `lts_rate`.
pub fn cluster_ladder(
    time_stepping: &TimeSteppingConfig,
    stable_step: f64,
    count: u32,
) -> Result<ClusterGraph, ConsistencyFault> {
    let min_step = (time_stepping.cfl * stable_step).min(time_stepping.max_timestep);
    ClusterGraph::multi_rate(min_step, time_stepping.lts_rate, count)
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete input of a simulation on one rank.
///
/// Consumed by [`Simulator::new`](crate::Simulator::new), which validates
/// it first.
pub struct SimulationConfig {
    /// Resolved parameter file.
    pub parameters: SimulationParameters,
    /// Local clusters plus mirrored remote neighbours.
    pub clusters: ClusterGraph,
    /// Number of fault faces per local cluster. Clusters absent here carry
    /// no fault.
    pub fault_faces: IndexMap<ClusterId, usize>,
    /// Per-cell material data of this rank.
    pub materials: Box<dyn ParameterStore + Send>,
    /// Rebuilds operators after material changes.
    pub operators: Box<dyn OperatorRecompute + Send>,
    /// Volume update of one cluster.
    pub stepper: Box<dyn ClusterStepper + Send>,
    /// Barrier shared with the other ranks.
    pub collective: Box<dyn Collective + Send>,
    /// Hooks registered before any lifecycle event fires, in order.
    pub hooks: Vec<Hook<SimulationContext>>,
}

impl SimulationConfig {
    /// Check every structural requirement without building anything.
    pub fn validate(&self) -> Result<(), RuptureError> {
        self.parameters.validate()?;
        if self.clusters.local_clusters().next().is_none() {
            return Err(ConfigurationError::InvalidValue {
                field: "clusters".to_owned(),
                reason: "at least one local cluster is required".to_owned(),
            }
            .into());
        }
        self.clusters.verify_ratios()?;
        for &cluster in self.fault_faces.keys() {
            match self.clusters.get(cluster) {
                Some(c) if c.is_local() => {}
                _ => return Err(ConsistencyFault::UnknownCluster { cluster }.into()),
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for SimulationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationConfig")
            .field("parameters", &self.parameters)
            .field("clusters", &self.clusters.len())
            .field("fault_faces", &self.fault_faces)
            .field("local_cells", &self.materials.local_cell_count())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
