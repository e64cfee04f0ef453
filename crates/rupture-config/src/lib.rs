//! Parameter-file reading and validated configuration.
//!
//! Parameter files are TOML documents whose keys are matched
//! case-insensitively. [`ParameterReader`] walks one section at a time,
//! remembers which keys were consumed and warns about the rest; the typed
//! sections ([`DRConfig`], [`ItmConfig`], [`TimeSteppingConfig`]) are read
//! once at startup and never mutated afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dr;
pub mod itm;
pub mod params;
pub mod reader;
pub mod time_stepping;

pub use dr::{
    DRConfig, ImposedSlipParams, PrakashCliftonParams, RateAndStateParams, SlipWeakeningParams,
    ThermalPressurizationParams,
};
pub use itm::ItmConfig;
pub use params::SimulationParameters;
pub use reader::{FromParameter, ParameterReader};
pub use time_stepping::TimeSteppingConfig;
