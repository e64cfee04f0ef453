//! Time-stepping configuration (`discretization` and `abortcriteria`).

use rupture_core::ConfigurationError;
use serde::Serialize;

use crate::reader::ParameterReader;

/// Clustered local-time-stepping and end-of-run parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeSteppingConfig {
    /// CFL number.
    pub cfl: f64,
    /// Upper bound on any step size (s).
    pub max_timestep: f64,
    /// Integer step-size ratio between adjacent clusters.
    pub lts_rate: u32,
    /// Simulation end time (s).
    pub end_time: f64,
}

impl Default for TimeSteppingConfig {
    fn default() -> Self {
        Self {
            cfl: 0.5,
            max_timestep: 5000.0,
            lts_rate: 2,
            end_time: 15.0,
        }
    }
}

impl TimeSteppingConfig {
    /// Read the `discretization` and `abortcriteria` sections.
    pub fn read(
        discretization: &mut ParameterReader,
        abort: &mut ParameterReader,
    ) -> Result<Self, ConfigurationError> {
        let defaults = Self::default();
        let config = Self {
            cfl: discretization.read_with_default("cfl", defaults.cfl)?,
            max_timestep: discretization.read_with_default("fixtimestep", defaults.max_timestep)?,
            lts_rate: discretization.read_with_default("clusteredlts", defaults.lts_rate)?,
            end_time: abort.read_with_default("endtime", defaults.end_time)?,
        };
        discretization.mark_unused("ltsweighttypeid");
        discretization.warn_deprecated(&[
            "ckmethod",
            "dgfineout1d",
            "fluxmethod",
            "iterationcriterion",
            "npoly",
            "npolyrec",
            "limitersecurityfactor",
            "order",
            "material",
            "npolymap",
        ]);
        abort.mark_unused("maxiterations");
        abort.warn_deprecated(&["maxtolerance", "maxtolcriterion", "walltime_h", "delay_h"]);
        config.validate()?;
        Ok(config)
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.cfl.is_finite() || self.cfl <= 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "cfl".to_owned(),
                reason: format!("must be finite and positive, got {}", self.cfl),
            });
        }
        if !self.max_timestep.is_finite() || self.max_timestep <= 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "fixtimestep".to_owned(),
                reason: format!("must be finite and positive, got {}", self.max_timestep),
            });
        }
        if self.lts_rate == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "clusteredlts".to_owned(),
                reason: "rate must be at least 1".to_owned(),
            });
        }
        if !self.end_time.is_finite() || self.end_time < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "endtime".to_owned(),
                reason: format!("must be finite and non-negative, got {}", self.end_time),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(doc: &str) -> Result<TimeSteppingConfig, ConfigurationError> {
        let mut root = ParameterReader::parse(doc).unwrap();
        let mut disc = root.subreader("discretization").unwrap();
        let mut abort = root.subreader("abortcriteria").unwrap();
        TimeSteppingConfig::read(&mut disc, &mut abort)
    }

    #[test]
    fn defaults() {
        assert_eq!(read("").unwrap(), TimeSteppingConfig::default());
    }

    #[test]
    fn reads_both_sections() {
        let config =
            read("[discretization]\nCFL = 0.4\nClusteredLTS = 3\n[abortcriteria]\nEndTime = 2.5\n")
                .unwrap();
        assert_eq!(config.cfl, 0.4);
        assert_eq!(config.lts_rate, 3);
        assert_eq!(config.end_time, 2.5);
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(read("[discretization]\nclusteredlts = 0\n").is_err());
    }

    #[test]
    fn negative_rate_is_invalid_value() {
        let err = read("[discretization]\nclusteredlts = -2\n").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }
}
