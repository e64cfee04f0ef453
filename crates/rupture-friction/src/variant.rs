//! The tag shared by every part of a bundle.

use std::fmt;

use rupture_core::FrictionLawKind;

/// Thermal-pressurization specialization of a kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TpVariant {
    /// Plain kernel.
    NoTP,
    /// Kernel coupled to pore-fluid pressure and temperature.
    ThermalPressurization,
}

impl TpVariant {
    /// Whether thermal pressurization is active.
    pub fn is_enabled(self) -> bool {
        self == Self::ThermalPressurization
    }
}

/// Friction law plus thermal-pressurization specialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BundleVariant {
    /// Selected friction law.
    pub kind: FrictionLawKind,
    /// Thermal-pressurization specialization.
    pub thermal_pressurization: TpVariant,
}

impl BundleVariant {
    /// Variant for `kind`; `tp_requested` only matters for kinds that
    /// define a thermal-pressurization specialization.
    pub fn resolve(kind: FrictionLawKind, tp_requested: bool) -> Self {
        let thermal_pressurization = if tp_requested && kind.supports_thermal_pressurization() {
            TpVariant::ThermalPressurization
        } else {
            TpVariant::NoTP
        };
        Self {
            kind,
            thermal_pressurization,
        }
    }
}

impl fmt::Display for BundleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.thermal_pressurization {
            TpVariant::NoTP => write!(f, "{}", self.kind),
            TpVariant::ThermalPressurization => write!(f, "{} + thermal pressurization", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tp_flag_ignored_without_specialization() {
        let v = BundleVariant::resolve(FrictionLawKind::LinearSlipWeakening, true);
        assert_eq!(v.thermal_pressurization, TpVariant::NoTP);
        let v = BundleVariant::resolve(FrictionLawKind::RateAndStateSlip, true);
        assert!(v.thermal_pressurization.is_enabled());
    }

    #[test]
    fn display_names_kind_and_specialization() {
        let v = BundleVariant::resolve(FrictionLawKind::RateAndStateAging, true);
        assert_eq!(v.to_string(), "RateAndStateAging (3) + thermal pressurization");
    }
}
