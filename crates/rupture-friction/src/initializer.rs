//! Initial fault state from the configuration.

use rupture_config::DRConfig;
use rupture_core::ConsistencyFault;

use crate::law::{self, FastVwParams};
use crate::layout::fields;
use crate::storage::FaultStorage;
use crate::variant::BundleVariant;

/// Which initialization procedure to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InitializerKind {
    /// Normal stress only.
    NoFault,
    /// Slip-weakening parameters and static strength.
    LinearSlipWeakening,
    /// Slip weakening plus the regularised strength.
    LinearSlipWeakeningBimaterial,
    /// Kinematic source parameters, Yoffe.
    ImposedSlipRatesYoffe,
    /// Kinematic source parameters, smooth step.
    ImposedSlipRatesGaussian,
    /// Aging or slip law at steady state.
    RateAndState,
    /// Fast velocity weakening at steady state.
    RateAndStateFastVelocity,
    /// Fast velocity weakening with temperature and pressure.
    RateAndStateThermalPressurization,
}

/// Fills freshly allocated [`FaultStorage`] with the initial fault state.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelInitializer {
    variant: BundleVariant,
    kind: InitializerKind,
    config: DRConfig,
}

impl ModelInitializer {
    /// Initializer of `kind` reading parameters from `config`.
    pub fn new(variant: BundleVariant, kind: InitializerKind, config: DRConfig) -> Self {
        Self {
            variant,
            kind,
            config,
        }
    }

    /// Bundle tag.
    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// Procedure.
    pub fn kind(&self) -> InitializerKind {
        self.kind
    }

    /// Populate every face of `storage`.
    pub fn initialize(&self, storage: &mut FaultStorage) -> Result<(), ConsistencyFault> {
        if storage.variant() != self.variant {
            return Err(ConsistencyFault::BundleMismatch {
                expected: self.variant.to_string(),
                part: "storage",
                found: storage.variant().to_string(),
            });
        }
        let sigma_n = self.config.initial_normal_stress;
        storage.fill(fields::NORMAL_STRESS, sigma_n)?;

        let tp = &self.config.thermal_pressurization;
        let sigma_eff = if self.variant.thermal_pressurization.is_enabled() {
            storage.fill(fields::TEMPERATURE, tp.initial_temperature)?;
            storage.fill(fields::PRESSURE, tp.initial_pressure)?;
            law::effective_normal_stress(sigma_n, tp.initial_pressure)
        } else {
            sigma_n
        };

        let rs = &self.config.rate_and_state;
        let mu = match self.kind {
            InitializerKind::NoFault => return Ok(()),
            InitializerKind::LinearSlipWeakening | InitializerKind::LinearSlipWeakeningBimaterial => {
                let sw = &self.config.slip_weakening;
                storage.fill(fields::MU_S, sw.mu_s)?;
                storage.fill(fields::MU_D, sw.mu_d)?;
                storage.fill(fields::D_C, sw.d_c)?;
                if self.kind == InitializerKind::LinearSlipWeakeningBimaterial {
                    storage.fill(fields::REGULARIZED_STRENGTH, sw.mu_s * sigma_eff.abs())?;
                }
                sw.mu_s
            }
            InitializerKind::ImposedSlipRatesYoffe | InitializerKind::ImposedSlipRatesGaussian => {
                let isr = &self.config.imposed_slip;
                storage.fill(fields::ONSET_TIME, isr.onset_time)?;
                storage.fill(fields::TAU_S, isr.tau_s)?;
                storage.fill(fields::RISE_TIME, isr.rise_time)?;
                return Ok(());
            }
            InitializerKind::RateAndState => {
                let v = rs.initial_slip_rate;
                let theta = rs.sl0 / v.max(law::SLIP_RATE_FLOOR);
                storage.fill(fields::RS_A, rs.a)?;
                storage.fill(fields::RS_SL0, rs.sl0)?;
                storage.fill(fields::SLIP_RATE, v)?;
                storage.fill(fields::STATE_VARIABLE, theta)?;
                law::rate_and_state_mu(rs.a, rs.b, rs.f0, rs.sr0, rs.sl0, v, theta)
            }
            InitializerKind::RateAndStateFastVelocity
            | InitializerKind::RateAndStateThermalPressurization => {
                let params = FastVwParams {
                    a: rs.a,
                    b: rs.b,
                    f0: rs.f0,
                    sr0: rs.sr0,
                    sl0: rs.sl0,
                    mu_w: rs.mu_w,
                    sr_w: rs.sr_w,
                };
                let v = rs.initial_slip_rate;
                let psi = params.steady_state(v);
                storage.fill(fields::RS_A, rs.a)?;
                storage.fill(fields::RS_SL0, rs.sl0)?;
                storage.fill(fields::RS_SR_W, rs.sr_w)?;
                storage.fill(fields::SLIP_RATE, v)?;
                storage.fill(fields::STATE_VARIABLE, psi)?;
                params.mu(psi, v)
            }
        };
        storage.fill(fields::FRICTION_COEFFICIENT, mu)?;
        storage.fill(fields::STRENGTH, mu * sigma_eff.abs())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutKind, StorageLayoutDescriptor};
    use rupture_core::FrictionLawKind;

    fn storage(kind: FrictionLawKind, tp: bool, layout: LayoutKind) -> FaultStorage {
        let variant = BundleVariant::resolve(kind, tp);
        FaultStorage::allocate(&StorageLayoutDescriptor::new(variant, layout), 2)
    }

    #[test]
    fn slip_weakening_starts_at_static_strength() {
        let config = DRConfig::new(FrictionLawKind::LinearSlipWeakening);
        let mut s = storage(config.friction_law_kind, false, LayoutKind::LinearSlipWeakening);
        let init = ModelInitializer::new(s.variant(), InitializerKind::LinearSlipWeakening, config);
        init.initialize(&mut s).unwrap();
        assert_eq!(s.field(fields::FRICTION_COEFFICIENT).unwrap(), &[0.6, 0.6]);
        assert_eq!(s.field(fields::STRENGTH).unwrap()[0], 0.6 * 120e6);
    }

    #[test]
    fn rate_and_state_starts_near_reference_friction() {
        let mut config = DRConfig::new(FrictionLawKind::RateAndStateAging);
        config.rate_and_state.initial_slip_rate = config.rate_and_state.sr0;
        let mut s = storage(config.friction_law_kind, false, LayoutKind::RateAndState);
        let init = ModelInitializer::new(s.variant(), InitializerKind::RateAndState, config);
        init.initialize(&mut s).unwrap();
        let mu = s.field(fields::FRICTION_COEFFICIENT).unwrap()[0];
        assert!((mu - 0.6).abs() < 1e-6);
    }

    #[test]
    fn thermal_pressurization_fields_initialized() {
        let mut config = DRConfig::new(FrictionLawKind::RateAndStateSlip)
            .with_thermal_pressurization(true);
        config.thermal_pressurization.initial_pressure = 20e6;
        let mut s = storage(config.friction_law_kind, true, LayoutKind::RateAndState);
        let init = ModelInitializer::new(s.variant(), InitializerKind::RateAndState, config);
        init.initialize(&mut s).unwrap();
        assert_eq!(s.field(fields::PRESSURE).unwrap(), &[20e6, 20e6]);
        assert_eq!(s.field(fields::TEMPERATURE).unwrap()[1], 483.15);
        let mu = s.field(fields::FRICTION_COEFFICIENT).unwrap()[0];
        let strength = s.field(fields::STRENGTH).unwrap()[0];
        assert!((strength - mu * 100e6).abs() <= 1e-6 * strength);
    }

    #[test]
    fn foreign_storage_rejected() {
        let config = DRConfig::new(FrictionLawKind::LinearSlipWeakening);
        let mut s = storage(FrictionLawKind::NoFault, false, LayoutKind::Base);
        let variant = BundleVariant::resolve(FrictionLawKind::LinearSlipWeakening, false);
        let init = ModelInitializer::new(variant, InitializerKind::LinearSlipWeakening, config);
        assert!(matches!(
            init.initialize(&mut s),
            Err(ConsistencyFault::BundleMismatch { .. })
        ));
    }
}
