//! Reusable simulation fixtures.
//!
//! - [`granite`]: a uniform crustal material.
//! - [`layered_materials`]: interior, copy and ghost layers of granite.
//! - [`ConfigBuilder`]: a ready-to-run [`SimulationConfig`] with mock
//!   collaborators that tests override piecemeal.

use indexmap::IndexMap;
use rupture_config::SimulationParameters;
use rupture_core::{
    CellMaterialData, ClusterId, FrictionLawKind, LayerKind, LayeredMaterials, OperatorRecompute,
};
use rupture_engine::{ClusterStepper, SimulationConfig, SimulationContext};
use rupture_lts::ClusterGraph;
use rupture_sync::{Collective, Hook, SingleRank};

use crate::{MockStepper, RecordingRecompute};

/// Density 2700 kg/m³, both Lamé parameters 32 GPa.
pub fn granite() -> CellMaterialData {
    CellMaterialData::new(2700.0, 3.2e10, 3.2e10)
}

/// `interior` interior cells, one copy cell and `ghosts` ghost cells.
pub fn layered_materials(interior: usize, ghosts: usize) -> LayeredMaterials {
    let mut store = LayeredMaterials::new();
    store.push_layer(LayerKind::Interior, vec![granite(); interior]);
    store.push_layer(LayerKind::Copy, vec![granite()]);
    store.push_layer(LayerKind::Ghost, vec![granite(); ghosts]);
    store
}

/// Builder for a [`SimulationConfig`] over mock collaborators.
///
/// Defaults: no fault, end time 1, a two-cluster ladder with steps 0.25
/// and 0.5, four interior cells plus one copy and two ghost cells,
/// [`MockStepper`] with zero slip rate, [`RecordingRecompute`] and
/// [`SingleRank`].
pub struct ConfigBuilder {
    parameters: SimulationParameters,
    clusters: ClusterGraph,
    fault_faces: IndexMap<ClusterId, usize>,
    materials: LayeredMaterials,
    operators: Box<dyn OperatorRecompute + Send>,
    stepper: Box<dyn ClusterStepper + Send>,
    collective: Box<dyn Collective + Send>,
    hooks: Vec<Hook<SimulationContext>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut parameters = SimulationParameters::default();
        parameters.time_stepping.end_time = 1.0;
        let clusters = match ClusterGraph::multi_rate(0.25, 2, 2) {
            Ok(graph) => graph,
            Err(fault) => panic!("fixture ladder is consistent: {fault}"),
        };
        Self {
            parameters,
            clusters,
            fault_faces: IndexMap::new(),
            materials: layered_materials(4, 2),
            operators: Box::new(RecordingRecompute::new()),
            stepper: Box::new(MockStepper::new(0.0)),
            collective: Box::new(SingleRank),
            hooks: Vec::new(),
        }
    }

    pub fn parameters(mut self, parameters: SimulationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn friction_law(mut self, kind: FrictionLawKind) -> Self {
        self.parameters.dynamic_rupture.friction_law_kind = kind;
        self
    }

    pub fn end_time(mut self, end_time: f64) -> Self {
        self.parameters.time_stepping.end_time = end_time;
        self
    }

    /// Enable the time mirror.
    pub fn mirror(mut self, factor: f64, trigger_time: f64, epsilon: f64) -> Self {
        let itm = &mut self.parameters.itm;
        itm.enabled = true;
        itm.velocity_scaling_factor = factor;
        itm.trigger_time = trigger_time;
        itm.itm_time = epsilon;
        self
    }

    pub fn clusters(mut self, clusters: ClusterGraph) -> Self {
        self.clusters = clusters;
        self
    }

    pub fn fault(mut self, cluster: ClusterId, faces: usize) -> Self {
        self.fault_faces.insert(cluster, faces);
        self
    }

    pub fn materials(mut self, materials: LayeredMaterials) -> Self {
        self.materials = materials;
        self
    }

    pub fn operators(mut self, operators: impl OperatorRecompute + Send + 'static) -> Self {
        self.operators = Box::new(operators);
        self
    }

    pub fn stepper(mut self, stepper: impl ClusterStepper + Send + 'static) -> Self {
        self.stepper = Box::new(stepper);
        self
    }

    pub fn collective(mut self, collective: impl Collective + Send + 'static) -> Self {
        self.collective = Box::new(collective);
        self
    }

    pub fn hook(mut self, hook: Hook<SimulationContext>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> SimulationConfig {
        SimulationConfig {
            parameters: self.parameters,
            clusters: self.clusters,
            fault_faces: self.fault_faces,
            materials: Box::new(self.materials),
            operators: self.operators,
            stepper: self.stepper,
            collective: self.collective,
            hooks: self.hooks,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
