//! The cluster graph and its step-size mutations.

use indexmap::IndexMap;
use rupture_core::{ClusterId, ConsistencyFault};
use smallvec::SmallVec;
use tracing::debug;

use crate::cluster::{NeighborRef, Ownership, TimeCluster};

/// Relative tolerance used by [`ClusterGraph::verify_ratios`].
pub const RATIO_TOLERANCE: f64 = 1e-12;

fn check_step(cluster: ClusterId, value: f64) -> Result<(), ConsistencyFault> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConsistencyFault::InvalidStepSize { cluster, value })
    }
}

fn check_factor(factor: f64) -> Result<(), ConsistencyFault> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(ConsistencyFault::InvalidFactor { factor })
    }
}

/// All clusters known to one rank, local and mirrored, in insertion order.
///
/// Iteration order is deterministic, so every rank visits its clusters in
/// the same order during a global rescaling event.
#[derive(Clone, Debug, Default)]
pub struct ClusterGraph {
    clusters: IndexMap<ClusterId, TimeCluster>,
}

impl ClusterGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard clustered-LTS ladder of `count` local clusters.
    ///
    /// Cluster `i` steps with `min_step * rate^i` and neighbours clusters
    /// `i - 1` and `i + 1`.
    pub fn multi_rate(min_step: f64, rate: u32, count: u32) -> Result<Self, ConsistencyFault> {
        if rate == 0 {
            return Err(ConsistencyFault::InvalidFactor { factor: 0.0 });
        }
        let mut graph = Self::new();
        let mut step = min_step;
        for i in 0..count {
            graph.add_cluster(ClusterId(i), step, Ownership::Local)?;
            if i > 0 {
                graph.connect(ClusterId(i - 1), ClusterId(i))?;
            }
            step *= f64::from(rate);
        }
        Ok(graph)
    }

    /// Register a cluster with no neighbours.
    pub fn add_cluster(
        &mut self,
        id: ClusterId,
        step_size: f64,
        ownership: Ownership,
    ) -> Result<(), ConsistencyFault> {
        check_step(id, step_size)?;
        if self.clusters.contains_key(&id) {
            return Err(ConsistencyFault::DuplicateCluster { cluster: id });
        }
        self.clusters
            .insert(id, TimeCluster::new(id, step_size, ownership));
        Ok(())
    }

    /// Make `a` and `b` neighbours of each other.
    ///
    /// Both records are derived from the current step sizes. Connecting an
    /// already connected pair, or a cluster to itself, changes nothing.
    pub fn connect(&mut self, a: ClusterId, b: ClusterId) -> Result<(), ConsistencyFault> {
        let step_a = self.step_size(a)?;
        let step_b = self.step_size(b)?;
        if a == b {
            debug!(cluster = %a, "ignoring self-connection");
            return Ok(());
        }
        self.link(a, b, step_b / step_a)?;
        self.link(b, a, step_a / step_b)?;
        Ok(())
    }

    fn link(&mut self, from: ClusterId, to: ClusterId, ratio: f64) -> Result<(), ConsistencyFault> {
        let cluster = self.get_mut(from)?;
        if cluster.neighbor(to).is_none() {
            cluster.neighbors_mut().push(NeighborRef::new(to, ratio));
        }
        Ok(())
    }

    /// Number of clusters, local and mirrored.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the graph has no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Look up a cluster.
    pub fn get(&self, id: ClusterId) -> Option<&TimeCluster> {
        self.clusters.get(&id)
    }

    fn get_mut(&mut self, id: ClusterId) -> Result<&mut TimeCluster, ConsistencyFault> {
        self.clusters
            .get_mut(&id)
            .ok_or(ConsistencyFault::UnknownCluster { cluster: id })
    }

    /// Step size of `id`.
    pub fn step_size(&self, id: ClusterId) -> Result<f64, ConsistencyFault> {
        self.get(id)
            .map(TimeCluster::step_size)
            .ok_or(ConsistencyFault::UnknownCluster { cluster: id })
    }

    /// All clusters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeCluster> {
        self.clusters.values()
    }

    /// Cluster IDs in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }

    /// Clusters advanced by this rank.
    pub fn local_clusters(&self) -> impl Iterator<Item = &TimeCluster> {
        self.iter().filter(|c| c.is_local())
    }

    /// Multiply the step size of `id` by `factor` and refresh the ratios
    /// `id` holds towards its neighbours.
    ///
    /// Only `id`'s own records are touched. Each neighbour's record back to
    /// `id` is stale until that neighbour is visited with
    /// [`refresh_ratios`](Self::refresh_ratios) or rescaled itself; a graph
    /// left in that state fails [`verify_ratios`](Self::verify_ratios).
    pub fn rescale_step_size(&mut self, id: ClusterId, factor: f64) -> Result<(), ConsistencyFault> {
        check_factor(factor)?;
        let cluster = self.get_mut(id)?;
        let step = cluster.step_size() * factor;
        check_step(id, step)?;
        cluster.set_step_size(step);
        self.refresh_ratios(id)
    }

    /// Recompute the ratios `id` holds from the live neighbour step sizes.
    pub fn refresh_ratios(&mut self, id: ClusterId) -> Result<(), ConsistencyFault> {
        let cluster = self
            .get(id)
            .ok_or(ConsistencyFault::UnknownCluster { cluster: id })?;
        let own = cluster.step_size();
        let ratios = cluster
            .neighbors()
            .iter()
            .map(|n| self.step_size(n.cluster()).map(|step| step / own))
            .collect::<Result<SmallVec<[f64; 4]>, _>>()?;
        let cluster = self.get_mut(id)?;
        for (record, ratio) in cluster.neighbors_mut().iter_mut().zip(ratios) {
            record.set_ratio(ratio);
        }
        Ok(())
    }

    /// Rescale every cluster by `factor`, then refresh every record.
    ///
    /// All step sizes change before any record is refreshed, so no record
    /// is ever derived from a mix of old and new step sizes.
    pub fn rescale_all(&mut self, factor: f64) -> Result<(), ConsistencyFault> {
        check_factor(factor)?;
        for cluster in self.clusters.values() {
            check_step(cluster.id(), cluster.step_size() * factor)?;
        }
        for cluster in self.clusters.values_mut() {
            let step = cluster.step_size() * factor;
            cluster.set_step_size(step);
        }
        let ids: Vec<ClusterId> = self.ids().collect();
        for id in ids {
            self.refresh_ratios(id)?;
        }
        debug!(factor, clusters = self.len(), "rescaled all cluster step sizes");
        Ok(())
    }

    /// Check that every stored ratio matches the live step-size quotient
    /// within [`RATIO_TOLERANCE`] (relative).
    pub fn verify_ratios(&self) -> Result<(), ConsistencyFault> {
        for cluster in self.iter() {
            for record in cluster.neighbors() {
                let expected = self.step_size(record.cluster())? / cluster.step_size();
                let stored = record.step_size_ratio();
                if (stored - expected).abs() > RATIO_TOLERANCE * expected.abs() {
                    return Err(ConsistencyFault::RatioMismatch {
                        cluster: cluster.id(),
                        neighbor: record.cluster(),
                        stored,
                        expected,
                    });
                }
            }
        }
        Ok(())
    }

    /// Smallest step size over local clusters.
    pub fn min_local_step(&self) -> Option<f64> {
        self.local_clusters()
            .map(TimeCluster::step_size)
            .min_by(f64::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rupture_core::Rank;

    fn pair() -> ClusterGraph {
        let mut graph = ClusterGraph::new();
        graph.add_cluster(ClusterId(0), 1.0, Ownership::Local).unwrap();
        graph.add_cluster(ClusterId(1), 2.0, Ownership::Local).unwrap();
        graph.connect(ClusterId(0), ClusterId(1)).unwrap();
        graph
    }

    fn ratio(graph: &ClusterGraph, from: u32, to: u32) -> f64 {
        graph
            .get(ClusterId(from))
            .unwrap()
            .neighbor(ClusterId(to))
            .unwrap()
            .step_size_ratio()
    }

    #[test]
    fn connect_derives_both_ratios() {
        let graph = pair();
        assert_eq!(ratio(&graph, 0, 1), 2.0);
        assert_eq!(ratio(&graph, 1, 0), 0.5);
        graph.verify_ratios().unwrap();
    }

    #[test]
    fn rescale_updates_own_records_only() {
        let mut graph = pair();
        graph.rescale_step_size(ClusterId(0), 0.5).unwrap();
        assert_eq!(graph.step_size(ClusterId(0)).unwrap(), 0.5);
        assert_eq!(ratio(&graph, 0, 1), 4.0);
        // The neighbour's record is stale until it is visited.
        assert_eq!(ratio(&graph, 1, 0), 0.5);
        assert!(matches!(
            graph.verify_ratios(),
            Err(ConsistencyFault::RatioMismatch { cluster, neighbor, .. })
                if cluster == ClusterId(1) && neighbor == ClusterId(0)
        ));
        graph.refresh_ratios(ClusterId(1)).unwrap();
        assert_eq!(ratio(&graph, 1, 0), 0.25);
        graph.verify_ratios().unwrap();
    }

    #[test]
    fn sequential_rescale_needs_a_visit_pass() {
        let mut graph = ClusterGraph::multi_rate(0.1, 3, 4).unwrap();
        let ids: Vec<_> = graph.ids().collect();
        for id in &ids {
            graph.rescale_step_size(*id, 0.25).unwrap();
        }
        // Cluster 0 derived its record before cluster 1 was rescaled.
        assert!(graph.verify_ratios().is_err());
        for id in &ids {
            graph.refresh_ratios(*id).unwrap();
        }
        graph.verify_ratios().unwrap();
    }

    #[test]
    fn rescale_all_keeps_ratios() {
        let mut graph = ClusterGraph::multi_rate(0.125, 2, 5).unwrap();
        graph.rescale_all(4.0).unwrap();
        graph.verify_ratios().unwrap();
        assert_eq!(graph.step_size(ClusterId(0)).unwrap(), 0.5);
        assert_eq!(ratio(&graph, 2, 3), 2.0);
        assert_eq!(ratio(&graph, 3, 2), 0.5);
    }

    #[test]
    fn ladder_shape() {
        let graph = ClusterGraph::multi_rate(1.0, 2, 3).unwrap();
        assert_eq!(graph.len(), 3);
        let middle = graph.get(ClusterId(1)).unwrap();
        assert_eq!(middle.neighbors().len(), 2);
        assert_eq!(middle.step_size(), 2.0);
        assert_eq!(graph.min_local_step(), Some(1.0));
    }

    #[test]
    fn remote_clusters_are_rescaled_too() {
        let mut graph = pair();
        graph
            .add_cluster(ClusterId(7), 4.0, Ownership::Remote(Rank(1)))
            .unwrap();
        graph.connect(ClusterId(1), ClusterId(7)).unwrap();
        graph.rescale_all(0.5).unwrap();
        assert_eq!(graph.step_size(ClusterId(7)).unwrap(), 2.0);
        assert_eq!(graph.local_clusters().count(), 2);
        graph.verify_ratios().unwrap();
    }

    #[test]
    fn duplicate_and_unknown_clusters_rejected() {
        let mut graph = pair();
        assert_eq!(
            graph.add_cluster(ClusterId(0), 1.0, Ownership::Local),
            Err(ConsistencyFault::DuplicateCluster {
                cluster: ClusterId(0)
            })
        );
        assert_eq!(
            graph.rescale_step_size(ClusterId(9), 2.0),
            Err(ConsistencyFault::UnknownCluster {
                cluster: ClusterId(9)
            })
        );
        assert!(graph.connect(ClusterId(0), ClusterId(9)).is_err());
    }

    #[test]
    fn bad_factors_leave_graph_untouched() {
        let mut graph = pair();
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(graph.rescale_all(factor).is_err());
            assert!(graph.rescale_step_size(ClusterId(0), factor).is_err());
        }
        assert_eq!(graph.step_size(ClusterId(0)).unwrap(), 1.0);
        graph.verify_ratios().unwrap();
    }

    #[test]
    fn connect_is_idempotent() {
        let mut graph = pair();
        graph.connect(ClusterId(1), ClusterId(0)).unwrap();
        graph.connect(ClusterId(0), ClusterId(0)).unwrap();
        assert_eq!(graph.get(ClusterId(0)).unwrap().neighbors().len(), 1);
    }
}
