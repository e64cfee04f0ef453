//! What a mirror hook needs from the simulation context.

use rupture_core::{ParameterStore, RuptureError};
use rupture_lts::ClusterGraph;

/// Mutable access to the state a mirror scaling touches.
///
/// Implemented by the driver's context; the controller never holds on to
/// any of these between firings.
pub trait MirrorTarget {
    /// The local cluster graph, including mirrored remote clusters.
    fn clusters_mut(&mut self) -> &mut ClusterGraph;

    /// Per-cell material data of this rank.
    fn materials_mut(&mut self) -> &mut dyn ParameterStore;

    /// Rebuild operators of the `affected` local cells from the current
    /// material data.
    fn recompute_operators(&mut self, affected: &[usize]) -> Result<(), RuptureError>;
}
