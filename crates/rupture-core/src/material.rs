//! Per-cell material data and the capabilities the core uses to reach it.
//!
//! Material storage is owned by the numerical layer. The core only sees it
//! through [`ParameterStore`], which iterates owned (non-ghost) cells, and
//! asks [`OperatorRecompute`] to rebuild anything derived from it.

use crate::error::RuptureError;

/// Isotropic elastic material of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMaterialData {
    /// Density (kg/m³).
    pub rho: f64,
    /// Shear modulus (Pa).
    pub mu: f64,
    /// First Lamé parameter (Pa).
    pub lambda: f64,
}

impl CellMaterialData {
    /// Construct from density and Lamé parameters.
    pub fn new(rho: f64, mu: f64, lambda: f64) -> Self {
        Self { rho, mu, lambda }
    }

    /// P-wave speed `sqrt((lambda + 2 mu) / rho)`.
    pub fn p_wave_speed(&self) -> f64 {
        ((self.lambda + 2.0 * self.mu) / self.rho).sqrt()
    }

    /// S-wave speed `sqrt(mu / rho)`.
    pub fn s_wave_speed(&self) -> f64 {
        (self.mu / self.rho).sqrt()
    }
}

/// Where a block of cells sits relative to the rank boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Cells with no remote neighbours.
    Interior,
    /// Owned cells whose data is sent to neighbouring ranks.
    Copy,
    /// Read-only replicas of a neighbouring rank's boundary cells.
    Ghost,
}

impl LayerKind {
    /// Whether this rank owns the cells of the layer.
    pub fn is_owned(self) -> bool {
        !matches!(self, Self::Ghost)
    }
}

/// Iteration capability over the per-cell material data of one rank.
///
/// Local cell indices are dense over owned cells only, in storage order.
pub trait ParameterStore {
    /// Number of owned (non-ghost) cells.
    fn local_cell_count(&self) -> usize;

    /// Visit every owned cell, skipping ghost cells.
    fn for_each_local_cell(&self, visit: &mut dyn FnMut(usize, &CellMaterialData));

    /// Visit every owned cell mutably, skipping ghost cells.
    fn for_each_local_cell_mut(&mut self, visit: &mut dyn FnMut(usize, &mut CellMaterialData));
}

/// Rebuilds precomputed per-cell operators after material data changed.
pub trait OperatorRecompute {
    /// Recompute the operators of `affected` local cells from `materials`.
    fn recompute_local_operators(
        &mut self,
        materials: &dyn ParameterStore,
        affected: &[usize],
    ) -> Result<(), RuptureError>;
}

/// A block of cells sharing a [`LayerKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialLayer {
    /// Ownership class of the block.
    pub kind: LayerKind,
    /// Material of each cell in the block.
    pub cells: Vec<CellMaterialData>,
}

/// Material storage split into interior, copy and ghost layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredMaterials {
    layers: Vec<MaterialLayer>,
}

impl LayeredMaterials {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer; layers are iterated in insertion order.
    pub fn push_layer(&mut self, kind: LayerKind, cells: Vec<CellMaterialData>) {
        self.layers.push(MaterialLayer { kind, cells });
    }

    /// All layers, ghost layers included.
    pub fn layers(&self) -> &[MaterialLayer] {
        &self.layers
    }

    /// Total number of cells including ghosts.
    pub fn total_cell_count(&self) -> usize {
        self.layers.iter().map(|l| l.cells.len()).sum()
    }
}

impl ParameterStore for LayeredMaterials {
    fn local_cell_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| l.kind.is_owned())
            .map(|l| l.cells.len())
            .sum()
    }

    fn for_each_local_cell(&self, visit: &mut dyn FnMut(usize, &CellMaterialData)) {
        let owned = self.layers.iter().filter(|l| l.kind.is_owned());
        for (index, cell) in owned.flat_map(|l| l.cells.iter()).enumerate() {
            visit(index, cell);
        }
    }

    fn for_each_local_cell_mut(&mut self, visit: &mut dyn FnMut(usize, &mut CellMaterialData)) {
        let owned = self.layers.iter_mut().filter(|l| l.kind.is_owned());
        for (index, cell) in owned.flat_map(|l| l.cells.iter_mut()).enumerate() {
            visit(index, cell);
        }
    }
}
