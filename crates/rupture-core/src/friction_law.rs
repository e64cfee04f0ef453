//! The closed enumeration of friction-law families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Friction law selected for the fault.
///
/// Every variant has a stable integer code used in parameter files.
/// Two variants are recognised but disabled: selecting them is a
/// configuration error, not a silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrictionLawKind {
    /// No dynamic rupture.
    NoFault,
    /// Kinematic source with a Yoffe source time function.
    ImposedSlipRatesYoffe,
    /// Kinematic source with a smooth-step (Gaussian) source time function.
    ImposedSlipRatesGaussian,
    /// Linear slip weakening.
    LinearSlipWeakening,
    /// Linear slip weakening with Prakash-Clifton regularisation for
    /// bimaterial faults.
    LinearSlipWeakeningBimaterial,
    /// Rate-and-state friction with the aging law.
    RateAndStateAging,
    /// Rate-and-state friction with the slip law.
    RateAndStateSlip,
    /// Rate-and-state velocity weakening (disabled).
    RateAndStateVelocityWeakening,
    /// Rate-and-state aging law with nucleation (disabled).
    RateAndStateAgingNucleation,
    /// Rate-and-state friction with strong (fast) velocity weakening.
    RateAndStateFastVelocityWeakening,
}

impl FrictionLawKind {
    /// Every variant, in code order.
    pub const ALL: [Self; 10] = [
        Self::NoFault,
        Self::RateAndStateAging,
        Self::RateAndStateSlip,
        Self::LinearSlipWeakeningBimaterial,
        Self::RateAndStateVelocityWeakening,
        Self::LinearSlipWeakening,
        Self::ImposedSlipRatesYoffe,
        Self::ImposedSlipRatesGaussian,
        Self::RateAndStateAgingNucleation,
        Self::RateAndStateFastVelocityWeakening,
    ];

    /// The integer code used in parameter files.
    pub fn code(self) -> i64 {
        match self {
            Self::NoFault => 0,
            Self::RateAndStateAging => 3,
            Self::RateAndStateSlip => 4,
            Self::LinearSlipWeakeningBimaterial => 6,
            Self::RateAndStateVelocityWeakening => 7,
            Self::LinearSlipWeakening => 16,
            Self::ImposedSlipRatesYoffe => 33,
            Self::ImposedSlipRatesGaussian => 34,
            Self::RateAndStateAgingNucleation => 101,
            Self::RateAndStateFastVelocityWeakening => 103,
        }
    }

    /// Look up a variant by its integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Look up a variant by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Canonical variant name.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoFault => "NoFault",
            Self::ImposedSlipRatesYoffe => "ImposedSlipRatesYoffe",
            Self::ImposedSlipRatesGaussian => "ImposedSlipRatesGaussian",
            Self::LinearSlipWeakening => "LinearSlipWeakening",
            Self::LinearSlipWeakeningBimaterial => "LinearSlipWeakeningBimaterial",
            Self::RateAndStateAging => "RateAndStateAging",
            Self::RateAndStateSlip => "RateAndStateSlip",
            Self::RateAndStateVelocityWeakening => "RateAndStateVelocityWeakening",
            Self::RateAndStateAgingNucleation => "RateAndStateAgingNucleation",
            Self::RateAndStateFastVelocityWeakening => "RateAndStateFastVelocityWeakening",
        }
    }

    /// Whether the variant is recognised but currently unsupported.
    pub fn is_disabled(self) -> bool {
        matches!(
            self,
            Self::RateAndStateVelocityWeakening | Self::RateAndStateAgingNucleation
        )
    }

    /// Whether the family defines a thermal-pressurization variant.
    ///
    /// For every other kind the thermal-pressurization flag is ignored.
    pub fn supports_thermal_pressurization(self) -> bool {
        matches!(
            self,
            Self::RateAndStateAging
                | Self::RateAndStateSlip
                | Self::RateAndStateFastVelocityWeakening
        )
    }
}

impl fmt::Display for FrictionLawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in FrictionLawKind::ALL {
            assert_eq!(FrictionLawKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(FrictionLawKind::from_code(5), None);
        assert_eq!(FrictionLawKind::from_code(-1), None);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(
            FrictionLawKind::from_name("linearslipweakening"),
            Some(FrictionLawKind::LinearSlipWeakening)
        );
        assert_eq!(
            FrictionLawKind::from_name(" RATEANDSTATEAGING "),
            Some(FrictionLawKind::RateAndStateAging)
        );
        assert_eq!(FrictionLawKind::from_name("coulomb"), None);
    }

    #[test]
    fn exactly_two_kinds_disabled() {
        let disabled: Vec<_> = FrictionLawKind::ALL
            .into_iter()
            .filter(|k| k.is_disabled())
            .collect();
        assert_eq!(
            disabled,
            vec![
                FrictionLawKind::RateAndStateVelocityWeakening,
                FrictionLawKind::RateAndStateAgingNucleation
            ]
        );
    }

    #[test]
    fn only_rate_and_state_family_has_tp() {
        assert!(FrictionLawKind::RateAndStateAging.supports_thermal_pressurization());
        assert!(FrictionLawKind::RateAndStateFastVelocityWeakening.supports_thermal_pressurization());
        assert!(!FrictionLawKind::LinearSlipWeakening.supports_thermal_pressurization());
        assert!(!FrictionLawKind::NoFault.supports_thermal_pressurization());
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(
            FrictionLawKind::RateAndStateVelocityWeakening.to_string(),
            "RateAndStateVelocityWeakening (7)"
        );
    }
}
