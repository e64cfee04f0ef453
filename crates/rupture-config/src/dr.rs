//! Dynamic-rupture configuration ([`DRConfig`]).

use rupture_core::{ConfigurationError, FrictionLawKind};
use serde::Serialize;
use toml::Value;
use tracing::debug;

use crate::reader::ParameterReader;

/// Linear slip-weakening parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlipWeakeningParams {
    /// Static friction coefficient.
    pub mu_s: f64,
    /// Dynamic friction coefficient.
    pub mu_d: f64,
    /// Critical slip distance (m).
    pub d_c: f64,
    /// Forced-rupture decay time (s); zero disables forced rupture.
    pub t_0: f64,
}

impl Default for SlipWeakeningParams {
    fn default() -> Self {
        Self {
            mu_s: 0.6,
            mu_d: 0.4,
            d_c: 0.4,
            t_0: 0.0,
        }
    }
}

/// Prakash-Clifton regularisation for bimaterial faults.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrakashCliftonParams {
    /// Reference velocity `v*` (m/s).
    pub v_star: f64,
    /// Regularisation length `L` (m).
    pub length: f64,
}

impl Default for PrakashCliftonParams {
    fn default() -> Self {
        Self {
            v_star: 0.01,
            length: 0.1,
        }
    }
}

/// Rate-and-state parameters shared by the aging, slip and
/// fast-velocity-weakening laws.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateAndStateParams {
    /// Direct-effect parameter `a`.
    pub a: f64,
    /// Evolution-effect parameter `b`.
    pub b: f64,
    /// Reference friction coefficient `f0`.
    pub f0: f64,
    /// Reference slip rate `V0` (m/s).
    pub sr0: f64,
    /// Characteristic slip distance `L` (m).
    pub sl0: f64,
    /// Fully weakened friction coefficient (fast velocity weakening).
    pub mu_w: f64,
    /// Weakening slip rate `V_w` (m/s, fast velocity weakening).
    pub sr_w: f64,
    /// Slip rate the state variable is initialised against (m/s).
    pub initial_slip_rate: f64,
}

impl Default for RateAndStateParams {
    fn default() -> Self {
        Self {
            a: 0.01,
            b: 0.014,
            f0: 0.6,
            sr0: 1e-6,
            sl0: 0.02,
            mu_w: 0.1,
            sr_w: 0.1,
            initial_slip_rate: 1e-16,
        }
    }
}

/// Kinematic (imposed slip-rate) source parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImposedSlipParams {
    /// Final slip (m).
    pub tau_s: f64,
    /// Rise time of the source time function (s).
    pub rise_time: f64,
    /// Rupture onset time (s).
    pub onset_time: f64,
}

impl Default for ImposedSlipParams {
    fn default() -> Self {
        Self {
            tau_s: 1.0,
            rise_time: 1.0,
            onset_time: 0.0,
        }
    }
}

/// Thermal pressurization (adiabatic, undrained) parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThermalPressurizationParams {
    /// Thermal diffusivity (m²/s).
    pub thermal_diffusivity: f64,
    /// Volumetric heat capacity `rho c` (J/(m³ K)).
    pub heat_capacity: f64,
    /// Undrained pressure response `Lambda` (Pa/K).
    pub undrained_response: f64,
    /// Half-width of the shear zone (m).
    pub half_width: f64,
    /// Initial temperature (K).
    pub initial_temperature: f64,
    /// Initial pore pressure (Pa); positive values reduce fault compression.
    pub initial_pressure: f64,
}

impl Default for ThermalPressurizationParams {
    fn default() -> Self {
        Self {
            thermal_diffusivity: 1e-6,
            heat_capacity: 2.7e6,
            undrained_response: 0.1e6,
            half_width: 0.01,
            initial_temperature: 483.15,
            initial_pressure: 0.0,
        }
    }
}

/// Immutable dynamic-rupture configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DRConfig {
    /// Selected friction law.
    pub friction_law_kind: FrictionLawKind,
    /// Whether thermal pressurization is requested. Only meaningful for
    /// the rate-and-state family; ignored otherwise.
    pub thermal_pressurization_enabled: bool,
    /// Initial fault-normal stress (Pa, compression negative).
    pub initial_normal_stress: f64,
    /// Linear slip-weakening parameters.
    pub slip_weakening: SlipWeakeningParams,
    /// Bimaterial regularisation parameters.
    pub prakash_clifton: PrakashCliftonParams,
    /// Rate-and-state parameters.
    pub rate_and_state: RateAndStateParams,
    /// Imposed slip-rate parameters.
    pub imposed_slip: ImposedSlipParams,
    /// Thermal pressurization parameters.
    pub thermal_pressurization: ThermalPressurizationParams,
}

impl Default for DRConfig {
    fn default() -> Self {
        Self::new(FrictionLawKind::NoFault)
    }
}

impl DRConfig {
    /// Configuration for `kind` with default model parameters.
    pub fn new(kind: FrictionLawKind) -> Self {
        Self {
            friction_law_kind: kind,
            thermal_pressurization_enabled: false,
            initial_normal_stress: -120e6,
            slip_weakening: SlipWeakeningParams::default(),
            prakash_clifton: PrakashCliftonParams::default(),
            rate_and_state: RateAndStateParams::default(),
            imposed_slip: ImposedSlipParams::default(),
            thermal_pressurization: ThermalPressurizationParams::default(),
        }
    }

    /// Same configuration with thermal pressurization toggled.
    pub fn with_thermal_pressurization(mut self, enabled: bool) -> Self {
        self.thermal_pressurization_enabled = enabled;
        self
    }

    /// Whether the selected kind actually uses thermal pressurization.
    pub fn uses_thermal_pressurization(&self) -> bool {
        self.thermal_pressurization_enabled
            && self.friction_law_kind.supports_thermal_pressurization()
    }

    /// Read the `dynamicrupture` section.
    ///
    /// `frictionLawKind` accepts an integer code or a variant name. Unknown
    /// values are rejected here; disabled kinds are accepted and rejected
    /// later by the friction-model factory.
    pub fn read(reader: &mut ParameterReader) -> Result<Self, ConfigurationError> {
        let kind = match reader.raw("frictionlawkind") {
            None => FrictionLawKind::NoFault,
            Some(Value::Integer(code)) => FrictionLawKind::from_code(*code).ok_or_else(|| {
                ConfigurationError::UnknownFrictionLaw {
                    value: code.to_string(),
                }
            })?,
            Some(Value::String(name)) => FrictionLawKind::from_name(name).ok_or_else(|| {
                ConfigurationError::UnknownFrictionLaw {
                    value: name.clone(),
                }
            })?,
            Some(other) => {
                return Err(ConfigurationError::InvalidValue {
                    field: "frictionlawkind".to_owned(),
                    reason: format!("expected an integer code or a name, got {other}"),
                })
            }
        };

        let defaults = Self::new(kind);
        let tp_enabled = reader.read_with_default("thermalpressurizationenabled", false)?;
        if tp_enabled && !kind.supports_thermal_pressurization() {
            debug!(
                kind = kind.name(),
                "thermal pressurization requested but the friction law has no such variant; ignoring"
            );
        }

        let sw = &defaults.slip_weakening;
        let slip_weakening = SlipWeakeningParams {
            mu_s: reader.read_with_default("mu_s", sw.mu_s)?,
            mu_d: reader.read_with_default("mu_d", sw.mu_d)?,
            d_c: reader.read_with_default("d_c", sw.d_c)?,
            t_0: reader.read_with_default("t_0", sw.t_0)?,
        };

        let pc = &defaults.prakash_clifton;
        let prakash_clifton = PrakashCliftonParams {
            v_star: reader.read_with_default("pc_v_star", pc.v_star)?,
            length: reader.read_with_default("pc_length", pc.length)?,
        };

        let rs = &defaults.rate_and_state;
        let rate_and_state = RateAndStateParams {
            a: reader.read_with_default("rs_a", rs.a)?,
            b: reader.read_with_default("rs_b", rs.b)?,
            f0: reader.read_with_default("rs_f0", rs.f0)?,
            sr0: reader.read_with_default("rs_sr0", rs.sr0)?,
            sl0: reader.read_with_default("rs_sl0", rs.sl0)?,
            mu_w: reader.read_with_default("rs_mu_w", rs.mu_w)?,
            sr_w: reader.read_with_default("rs_srw", rs.sr_w)?,
            initial_slip_rate: reader
                .read_with_default("rs_initial_slip_rate", rs.initial_slip_rate)?,
        };

        let isr = &defaults.imposed_slip;
        let imposed_slip = ImposedSlipParams {
            tau_s: reader.read_with_default("isr_tau_s", isr.tau_s)?,
            rise_time: reader.read_with_default("isr_rise_time", isr.rise_time)?,
            onset_time: reader.read_with_default("isr_onset_time", isr.onset_time)?,
        };

        let tp = &defaults.thermal_pressurization;
        let thermal_pressurization = ThermalPressurizationParams {
            thermal_diffusivity: reader
                .read_with_default("tp_thermal_diffusivity", tp.thermal_diffusivity)?,
            heat_capacity: reader.read_with_default("tp_heat_capacity", tp.heat_capacity)?,
            undrained_response: reader
                .read_with_default("tp_undrained_response", tp.undrained_response)?,
            half_width: reader.read_with_default("tp_half_width", tp.half_width)?,
            initial_temperature: reader
                .read_with_default("tp_initial_temperature", tp.initial_temperature)?,
            initial_pressure: reader
                .read_with_default("tp_initial_pressure", tp.initial_pressure)?,
        };

        let initial_normal_stress =
            reader.read_with_default("initial_normal_stress", defaults.initial_normal_stress)?;

        reader.warn_deprecated(&["outputpointtype", "refpointmethod"]);

        let config = Self {
            friction_law_kind: kind,
            thermal_pressurization_enabled: tp_enabled,
            initial_normal_stress,
            slip_weakening,
            prakash_clifton,
            rate_and_state,
            imposed_slip,
            thermal_pressurization,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters the selected kind depends on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        use FrictionLawKind as K;

        let positive = |field: &str, value: f64| -> Result<(), ConfigurationError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigurationError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("must be finite and positive, got {value}"),
                })
            }
        };

        if !self.initial_normal_stress.is_finite() {
            return Err(ConfigurationError::InvalidValue {
                field: "initial_normal_stress".to_owned(),
                reason: format!("must be finite, got {}", self.initial_normal_stress),
            });
        }

        match self.friction_law_kind {
            K::NoFault | K::RateAndStateVelocityWeakening | K::RateAndStateAgingNucleation => {}
            K::LinearSlipWeakening | K::LinearSlipWeakeningBimaterial => {
                positive("d_c", self.slip_weakening.d_c)?;
                if self.slip_weakening.t_0 < 0.0 || !self.slip_weakening.t_0.is_finite() {
                    return Err(ConfigurationError::InvalidValue {
                        field: "t_0".to_owned(),
                        reason: format!(
                            "must be finite and non-negative, got {}",
                            self.slip_weakening.t_0
                        ),
                    });
                }
                if self.friction_law_kind == K::LinearSlipWeakeningBimaterial {
                    positive("pc_length", self.prakash_clifton.length)?;
                }
            }
            K::ImposedSlipRatesYoffe | K::ImposedSlipRatesGaussian => {
                positive("isr_rise_time", self.imposed_slip.rise_time)?;
            }
            K::RateAndStateAging | K::RateAndStateSlip | K::RateAndStateFastVelocityWeakening => {
                positive("rs_a", self.rate_and_state.a)?;
                positive("rs_sr0", self.rate_and_state.sr0)?;
                positive("rs_sl0", self.rate_and_state.sl0)?;
                positive("rs_initial_slip_rate", self.rate_and_state.initial_slip_rate)?;
                if self.friction_law_kind == K::RateAndStateFastVelocityWeakening {
                    positive("rs_srw", self.rate_and_state.sr_w)?;
                }
                if self.uses_thermal_pressurization() {
                    positive("tp_heat_capacity", self.thermal_pressurization.heat_capacity)?;
                    positive("tp_half_width", self.thermal_pressurization.half_width)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(doc: &str) -> Result<DRConfig, ConfigurationError> {
        let mut root = ParameterReader::parse(doc).unwrap();
        let mut section = root.subreader("dynamicrupture").unwrap();
        DRConfig::read(&mut section)
    }

    #[test]
    fn absent_section_means_no_fault() {
        let config = read("").unwrap();
        assert_eq!(config.friction_law_kind, FrictionLawKind::NoFault);
        assert!(!config.thermal_pressurization_enabled);
    }

    #[test]
    fn kind_by_code() {
        let config = read("[DynamicRupture]\nFrictionLawKind = 16\n").unwrap();
        assert_eq!(config.friction_law_kind, FrictionLawKind::LinearSlipWeakening);
    }

    #[test]
    fn kind_by_name() {
        let config =
            read("[dynamicrupture]\nfrictionlawkind = \"rateandstateaging\"\nthermalPressurizationEnabled = 1\n")
                .unwrap();
        assert_eq!(config.friction_law_kind, FrictionLawKind::RateAndStateAging);
        assert!(config.uses_thermal_pressurization());
    }

    #[test]
    fn unknown_code_rejected() {
        let err = read("[dynamicrupture]\nfrictionlawkind = 42\n").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownFrictionLaw {
                value: "42".into()
            }
        );
    }

    #[test]
    fn disabled_kind_is_readable() {
        let config = read("[dynamicrupture]\nfrictionlawkind = 7\n").unwrap();
        assert!(config.friction_law_kind.is_disabled());
    }

    #[test]
    fn tp_flag_ignored_for_slip_weakening() {
        let config =
            read("[dynamicrupture]\nfrictionlawkind = 16\nthermalpressurizationenabled = true\n")
                .unwrap();
        assert!(config.thermal_pressurization_enabled);
        assert!(!config.uses_thermal_pressurization());
    }

    #[test]
    fn model_scalars_override_defaults() {
        let config = read(
            "[dynamicrupture]\nfrictionlawkind = 3\nrs_a = 0.02\nrs_sl0 = 0.5\nRS_SRW = 0.2\n",
        )
        .unwrap();
        assert_eq!(config.rate_and_state.a, 0.02);
        assert_eq!(config.rate_and_state.sl0, 0.5);
        assert_eq!(config.rate_and_state.sr_w, 0.2);
        assert_eq!(config.rate_and_state.b, RateAndStateParams::default().b);
    }

    #[test]
    fn non_positive_dc_rejected() {
        let err = read("[dynamicrupture]\nfrictionlawkind = 16\nd_c = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { field, .. } if field == "d_c"));
    }

    #[test]
    fn array_kind_rejected() {
        let err = read("[dynamicrupture]\nfrictionlawkind = [1]\n").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }
}
