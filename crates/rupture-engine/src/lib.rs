//! Simulation driver.
//!
//! A [`Simulator`] owns the cluster graph, the material store, the fault
//! storages produced from the friction bundle and the synchronization
//! registry. [`Simulator::run`] advances every local cluster with its own
//! step size up to the next scheduled synchronization point, updates the
//! fault state after each cluster step, records output frames and fires
//! the hooks due at that point, until the configured end time.
//!
//! Cluster stepping itself belongs to the numerical layer and is reached
//! through [`ClusterStepper`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod metrics;
pub mod simulator;
pub mod stepper;

pub use config::{cluster_ladder, SimulationConfig};
pub use context::SimulationContext;
pub use metrics::RunSummary;
pub use simulator::Simulator;
pub use stepper::ClusterStepper;
