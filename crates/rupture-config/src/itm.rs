//! Instantaneous time mirror (ITM) configuration.

use rupture_core::{ConfigurationError, TIME_TOLERANCE};
use serde::Serialize;

use crate::reader::ParameterReader;

/// Parameters of the instantaneous time mirror: a velocity-model scaling
/// applied at `trigger_time` and undone `itm_time` later.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItmConfig {
    /// Whether the mirror pair is armed at all.
    pub enabled: bool,
    /// Trigger time `t0` of the first (forward) scaling.
    pub trigger_time: f64,
    /// Characteristic interaction time; the reverse scaling fires at
    /// `trigger_time + itm_time`.
    pub itm_time: f64,
    /// Velocity scaling factor `f` of the forward scaling.
    pub velocity_scaling_factor: f64,
}

impl Default for ItmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger_time: 0.0,
            itm_time: 1.0,
            velocity_scaling_factor: 1.0,
        }
    }
}

impl ItmConfig {
    /// Material-model keys that share the `equations` section but are
    /// consumed by the numerical layer.
    const MODEL_KEYS: &'static [&'static str] = &[
        "materialfilename",
        "boundaryfilename",
        "gravitationalacceleration",
        "plasticity",
        "tv",
        "usecellhomogenizedmaterial",
        "freqcentral",
        "freqratio",
        "itmreflectiontype",
    ];

    /// Read the ITM keys of the `equations` section.
    pub fn read(reader: &mut ParameterReader) -> Result<Self, ConfigurationError> {
        let defaults = Self::default();
        let config = Self {
            enabled: reader.read_with_default("itmenable", defaults.enabled)?,
            trigger_time: reader.read_with_default("itmstarttime", defaults.trigger_time)?,
            itm_time: reader.read_with_default("itmtime", defaults.itm_time)?,
            velocity_scaling_factor: reader
                .read_with_default("itmvelocityscalingfactor", defaults.velocity_scaling_factor)?,
        };
        reader.mark_unused_all(Self::MODEL_KEYS);
        reader.warn_deprecated(&["adjoint", "adjfilename", "anisotropy"]);
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters when the mirror is enabled.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.enabled {
            return Ok(());
        }
        let factor = self.velocity_scaling_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "itmvelocityscalingfactor".to_owned(),
                reason: format!("must be finite and positive, got {factor}"),
            });
        }
        if !self.itm_time.is_finite() || self.itm_time <= TIME_TOLERANCE {
            return Err(ConfigurationError::InvalidValue {
                field: "itmtime".to_owned(),
                reason: format!(
                    "must be finite and greater than the time tolerance {TIME_TOLERANCE}, got {}",
                    self.itm_time
                ),
            });
        }
        if !self.trigger_time.is_finite() || self.trigger_time < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "itmstarttime".to_owned(),
                reason: format!(
                    "must be finite and non-negative, got {}",
                    self.trigger_time
                ),
            });
        }
        Ok(())
    }
}
