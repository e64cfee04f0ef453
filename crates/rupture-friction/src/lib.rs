//! Friction-model selection and bundle construction.
//!
//! [`FrictionModelFactory::produce`] maps a [`DRConfig`](rupture_config::DRConfig)
//! to a [`ProductBundle`]: a storage layout, a model initializer, a friction
//! kernel and an output manager, all tagged with the same
//! [`BundleVariant`]. Construction is a single exhaustive match; either all
//! four parts are built or a
//! [`ConfigurationError`](rupture_core::ConfigurationError) is returned.
//!
//! # Examples
//!
//! ```
//! use rupture_config::DRConfig;
//! use rupture_core::FrictionLawKind;
//! use rupture_friction::{FrictionModelFactory, OutputKind, TpVariant};
//!
//! let config = DRConfig::new(FrictionLawKind::RateAndStateAging).with_thermal_pressurization(true);
//! let bundle = FrictionModelFactory::produce(&config).unwrap();
//! assert_eq!(bundle.variant().thermal_pressurization, TpVariant::ThermalPressurization);
//! assert_eq!(bundle.output().kind(), OutputKind::RateAndStateThermalPressurization);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bundle;
pub mod factory;
pub mod initializer;
pub mod kernel;
pub mod law;
pub mod layout;
pub mod output;
pub mod storage;
pub mod variant;

pub use bundle::{BundleParts, ProductBundle};
pub use factory::FrictionModelFactory;
pub use initializer::{InitializerKind, ModelInitializer};
pub use kernel::{FrictionKernel, FrictionLaw, LswSpecialization, SourceTimeFunction, StateLaw};
pub use layout::{FieldDef, LayoutKind, StorageLayoutDescriptor};
pub use output::{OutputFrame, OutputKind, OutputManager};
pub use storage::{FaultStorage, FieldIndex};
pub use variant::{BundleVariant, TpVariant};
