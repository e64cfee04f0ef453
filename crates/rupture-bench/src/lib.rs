//! Benchmark profiles for the rupture simulation core.
//!
//! - [`wide_ladder`]: a deep clustered-LTS ladder with remote mirrors
//! - [`fault_profile`]: a fault storage of a given kind, initialized and
//!   ready for kernel evaluation

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rupture_config::DRConfig;
use rupture_core::{ClusterId, ConfigurationError, ConsistencyFault, FrictionLawKind, Rank};
use rupture_friction::{BundleParts, FaultStorage, FrictionModelFactory};
use rupture_lts::{ClusterGraph, Ownership};

/// `count` local clusters with rate 2, each mirrored once on a remote rank.
///
/// Remote copies take IDs `count..2 * count` and neighbour their local
/// counterpart.
pub fn wide_ladder(count: u32) -> Result<ClusterGraph, ConsistencyFault> {
    let mut graph = ClusterGraph::multi_rate(1e-4, 2, count)?;
    for i in 0..count {
        let local = ClusterId(i);
        let remote = ClusterId(count + i);
        let step = graph.step_size(local)?;
        graph.add_cluster(remote, step, Ownership::Remote(Rank(1)))?;
        graph.connect(local, remote)?;
    }
    Ok(graph)
}

/// Bundle parts and an initialized storage of `faces` faces for `kind`.
pub fn fault_profile(
    kind: FrictionLawKind,
    faces: usize,
) -> Result<(BundleParts, FaultStorage), String> {
    let bundle = FrictionModelFactory::produce(&DRConfig::new(kind))
        .map_err(|e: ConfigurationError| e.to_string())?;
    let parts = bundle.into_parts();
    let storage = parts.allocate_storage(faces).map_err(|e| e.to_string())?;
    Ok((parts, storage))
}
