//! Core types and traits for the Rupture simulation core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the rest of the workspace:
//! identifiers, the friction-law enumeration, the fatal error taxonomy,
//! per-cell material data, and the capability traits through which the
//! core reaches into the numerical layer (material iteration, operator
//! recomputation, device memory).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod device;
pub mod error;
pub mod friction_law;
pub mod id;
pub mod material;

pub use device::{BatchPointers, DeviceMemory, DevicePtr};
pub use error::{
    CollectiveDesyncFault, ConfigurationError, ConsistencyFault, DeviceError, RuptureError,
};
pub use friction_law::FrictionLawKind;
pub use id::{ClusterId, HookId, Rank};
pub use material::{
    CellMaterialData, LayerKind, LayeredMaterials, MaterialLayer, OperatorRecompute,
    ParameterStore,
};

/// Absolute tolerance when comparing simulation times, such as a
/// scheduled hook time against the current synchronization point.
pub const TIME_TOLERANCE: f64 = 1e-9;
