//! The numerical layer's cluster update, seen from the driver.

use rupture_core::{ClusterId, RuptureError};

/// Advances the volume solution of one cluster.
pub trait ClusterStepper {
    /// Advance `cluster` from `time` to `time + dt`.
    ///
    /// Returns the slip rate of every fault face of the cluster over the
    /// step, in storage order. Clusters without fault faces, and faces
    /// driven by imposed slip rates, return an empty vector.
    fn advance(&mut self, cluster: ClusterId, time: f64, dt: f64)
        -> Result<Vec<f64>, RuptureError>;
}
