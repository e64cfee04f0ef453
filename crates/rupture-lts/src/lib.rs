//! Local-time-stepping (LTS) clusters and their neighbour relations.
//!
//! Every [`TimeCluster`] advances with its own step size. A cluster keeps
//! one [`NeighborRef`] per neighbour holding the *ratio*
//! `neighbour.step_size / own.step_size`. Ratios are derived, never set:
//! any step-size change is followed by a refresh of the affected records,
//! and [`ClusterGraph::verify_ratios`] checks that every record matches
//! the live quotient.
//!
//! # Examples
//!
//! ```
//! use rupture_core::ClusterId;
//! use rupture_lts::ClusterGraph;
//!
//! let mut graph = ClusterGraph::multi_rate(0.25, 2, 3).unwrap();
//! graph.rescale_all(0.5).unwrap();
//! assert_eq!(graph.step_size(ClusterId(2)).unwrap(), 0.5);
//! graph.verify_ratios().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod graph;

pub use cluster::{NeighborRef, Ownership, TimeCluster};
pub use graph::{ClusterGraph, RATIO_TOLERANCE};
