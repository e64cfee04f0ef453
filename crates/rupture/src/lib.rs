//! Rupture: the coordination core of a dynamic-rupture earthquake solver.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all rupture sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use rupture::prelude::*;
//!
//! let params = SimulationParameters::from_toml_str(
//!     r#"
//!     [dynamicrupture]
//!     frictionLawKind = "LinearSlipWeakening"
//!
//!     [equations]
//!     itmEnable = 1
//!     itmStartTime = 0.5
//!     itmTime = 0.25
//!     itmVelocityScalingFactor = 2.0
//!     "#,
//! )
//! .unwrap();
//!
//! let bundle = FrictionModelFactory::produce(&params.dynamic_rupture).unwrap();
//! assert_eq!(bundle.variant().kind, FrictionLawKind::LinearSlipWeakening);
//!
//! let mut clusters = ClusterGraph::multi_rate(0.01, 2, 3).unwrap();
//! clusters.rescale_all(0.5).unwrap();
//! clusters.verify_ratios().unwrap();
//!
//! let controller = ParameterMirrorController::from_config(&params.itm)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(controller.reverse_time(), 0.75);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rupture-core` | IDs, friction law kinds, errors, material and device capabilities |
//! | [`config`] | `rupture-config` | Parameter reader and typed configuration sections |
//! | [`lts`] | `rupture-lts` | Cluster graph for local time stepping |
//! | [`sync`] | `rupture-sync` | Synchronization hook registry and collectives |
//! | [`friction`] | `rupture-friction` | Friction model factory and bundle parts |
//! | [`mirror`] | `rupture-mirror` | Instantaneous time mirror |
//! | [`engine`] | `rupture-engine` | Simulation driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors and capabilities (`rupture-core`).
pub use rupture_core as types;

/// Parameter file reading (`rupture-config`).
///
/// Start from [`config::SimulationParameters::from_toml_str`] or
/// [`config::SimulationParameters::from_path`].
pub use rupture_config as config;

/// Clustered local time stepping (`rupture-lts`).
pub use rupture_lts as lts;

/// Synchronization hooks (`rupture-sync`).
///
/// [`sync::SyncRegistry`] fires hooks behind a [`sync::Collective`]
/// barrier.
pub use rupture_sync as sync;

/// Friction models (`rupture-friction`).
pub use rupture_friction as friction;

/// Instantaneous time mirror (`rupture-mirror`).
pub use rupture_mirror as mirror;

/// Simulation driver (`rupture-engine`).
pub use rupture_engine as engine;

/// Common imports for typical rupture usage.
///
/// ```rust
/// use rupture::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use rupture_core::{
        CellMaterialData, ClusterId, FrictionLawKind, HookId, LayerKind, LayeredMaterials,
        OperatorRecompute, ParameterStore, Rank,
    };

    // Errors
    pub use rupture_core::{
        CollectiveDesyncFault, ConfigurationError, ConsistencyFault, RuptureError,
    };

    // Configuration
    pub use rupture_config::{DRConfig, ItmConfig, SimulationParameters, TimeSteppingConfig};

    // Local time stepping
    pub use rupture_lts::{ClusterGraph, Ownership};

    // Synchronization
    pub use rupture_sync::{
        ChannelCollective, Collective, Hook, HookCall, SingleRank, SyncEvent, SyncRegistry,
    };

    // Friction
    pub use rupture_friction::{FaultStorage, FrictionModelFactory, ProductBundle};

    // Mirror
    pub use rupture_mirror::{MirrorTarget, ParameterMirrorController};

    // Engine
    pub use rupture_engine::{ClusterStepper, RunSummary, SimulationConfig, Simulator};
}
