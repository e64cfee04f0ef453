//! The full parameter file ([`SimulationParameters`]).

use std::path::Path;

use rupture_core::ConfigurationError;
use serde::Serialize;
use tracing::{info, warn};

use crate::dr::DRConfig;
use crate::itm::ItmConfig;
use crate::reader::ParameterReader;
use crate::time_stepping::TimeSteppingConfig;

/// Sections that belong to the numerical or I/O layers and are accepted
/// without interpretation.
const FOREIGN_SECTIONS: &[&str] = &[
    "meshnml",
    "output",
    "sourcetype",
    "initialization",
    "elementwise",
    "pickpoint",
];

/// Validated configuration for one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimulationParameters {
    /// `dynamicrupture` section.
    pub dynamic_rupture: DRConfig,
    /// ITM keys of the `equations` section.
    pub itm: ItmConfig,
    /// `discretization` and `abortcriteria` sections.
    pub time_stepping: TimeSteppingConfig,
}

impl SimulationParameters {
    /// Parse and validate a TOML parameter document.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigurationError> {
        let mut root = ParameterReader::parse(document)?;
        Self::read(&mut root)
    }

    /// Read and validate a parameter file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "reading parameter file");
        Self::from_toml_str(&document)
    }

    /// Read every known section from `root`.
    pub fn read(root: &mut ParameterReader) -> Result<Self, ConfigurationError> {
        let mut dr_section = root.subreader("dynamicrupture")?;
        let dynamic_rupture = DRConfig::read(&mut dr_section)?;
        dr_section.warn_leftover();

        let mut equations = root.subreader("equations")?;
        let itm = ItmConfig::read(&mut equations)?;
        equations.warn_leftover();

        let mut discretization = root.subreader("discretization")?;
        let mut abort = root.subreader("abortcriteria")?;
        let time_stepping = TimeSteppingConfig::read(&mut discretization, &mut abort)?;
        discretization.warn_leftover();
        abort.warn_leftover();

        root.mark_unused_all(FOREIGN_SECTIONS);
        for section in root.leftover() {
            warn!(section = %section, "section is not known");
        }

        let params = Self {
            dynamic_rupture,
            itm,
            time_stepping,
        };
        params.validate()?;
        Ok(params)
    }

    /// Cross-section checks; each section validates itself on read.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.dynamic_rupture.validate()?;
        self.itm.validate()?;
        self.time_stepping.validate()?;
        if self.itm.enabled && self.itm.trigger_time > self.time_stepping.end_time {
            warn!(
                trigger_time = self.itm.trigger_time,
                end_time = self.time_stepping.end_time,
                "time mirror triggers after the end of the simulation and will never fire"
            );
        }
        Ok(())
    }

    /// Render the effective configuration as TOML, for run records.
    ///
    /// The output mirrors the typed structure, not the parameter-file
    /// layout, and is not meant to be read back.
    pub fn to_toml_string(&self) -> Result<String, ConfigurationError> {
        toml::to_string(self).map_err(|e| ConfigurationError::Malformed {
            reason: e.to_string(),
        })
    }
}
