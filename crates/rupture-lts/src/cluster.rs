//! A single time cluster and its neighbour records.

use rupture_core::{ClusterId, Rank};
use smallvec::SmallVec;

/// Which rank advances a cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Advanced by this rank.
    Local,
    /// Mirror of a cluster advanced by a neighbouring rank. It is rescaled
    /// together with local clusters so that the ratios local clusters hold
    /// towards it stay correct.
    Remote(Rank),
}

/// One cluster's view of a neighbour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborRef {
    cluster: ClusterId,
    step_size_ratio: f64,
}

impl NeighborRef {
    pub(crate) fn new(cluster: ClusterId, step_size_ratio: f64) -> Self {
        Self {
            cluster,
            step_size_ratio,
        }
    }

    /// The neighbouring cluster.
    pub fn cluster(&self) -> ClusterId {
        self.cluster
    }

    /// `neighbour.step_size / owner.step_size` as of the last refresh.
    pub fn step_size_ratio(&self) -> f64 {
        self.step_size_ratio
    }

    pub(crate) fn set_ratio(&mut self, ratio: f64) {
        self.step_size_ratio = ratio;
    }
}

/// A set of cells advanced with a uniform step size.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeCluster {
    id: ClusterId,
    step_size: f64,
    ownership: Ownership,
    neighbors: SmallVec<[NeighborRef; 4]>,
}

impl TimeCluster {
    pub(crate) fn new(id: ClusterId, step_size: f64, ownership: Ownership) -> Self {
        Self {
            id,
            step_size,
            ownership,
            neighbors: SmallVec::new(),
        }
    }

    /// Cluster identifier.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Current step size in seconds.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Owning rank.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Whether this rank advances the cluster.
    pub fn is_local(&self) -> bool {
        self.ownership == Ownership::Local
    }

    /// Neighbour records, in connection order.
    pub fn neighbors(&self) -> &[NeighborRef] {
        &self.neighbors
    }

    /// The record for `neighbor`, if connected.
    pub fn neighbor(&self, neighbor: ClusterId) -> Option<&NeighborRef> {
        self.neighbors.iter().find(|n| n.cluster == neighbor)
    }

    pub(crate) fn set_step_size(&mut self, step_size: f64) {
        self.step_size = step_size;
    }

    pub(crate) fn neighbors_mut(&mut self) -> &mut SmallVec<[NeighborRef; 4]> {
        &mut self.neighbors
    }
}
