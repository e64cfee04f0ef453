//! Friction-law dispatch.

use rupture_config::DRConfig;
use rupture_core::{ConfigurationError, FrictionLawKind};
use tracing::{error, info};

use crate::bundle::ProductBundle;
use crate::initializer::{InitializerKind, ModelInitializer};
use crate::kernel::{FrictionKernel, FrictionLaw, LswSpecialization, SourceTimeFunction, StateLaw};
use crate::layout::{LayoutKind, StorageLayoutDescriptor};
use crate::output::{OutputKind, OutputManager};
use crate::variant::BundleVariant;

/// Builds [`ProductBundle`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrictionModelFactory;

impl FrictionModelFactory {
    /// Resolve an integer friction-law code.
    pub fn kind_from_code(code: i64) -> Result<FrictionLawKind, ConfigurationError> {
        FrictionLawKind::from_code(code).ok_or_else(|| {
            error!(code, "unknown friction law");
            ConfigurationError::UnknownFrictionLaw {
                value: code.to_string(),
            }
        })
    }

    /// Build the bundle for `config`.
    ///
    /// Disabled kinds are rejected; no fallback bundle is substituted.
    pub fn produce(config: &DRConfig) -> Result<ProductBundle, ConfigurationError> {
        use FrictionLawKind as K;
        use LayoutKind as L;

        let kind = config.friction_law_kind;
        let variant = BundleVariant::resolve(kind, config.thermal_pressurization_enabled);
        let tp = variant.thermal_pressurization.is_enabled();
        let rs_output = if tp {
            OutputKind::RateAndStateThermalPressurization
        } else {
            OutputKind::RateAndState
        };

        let (layout, initializer, law, output) = match kind {
            K::NoFault => (
                L::Base,
                InitializerKind::NoFault,
                FrictionLaw::NoFault,
                OutputKind::NoFault,
            ),
            K::LinearSlipWeakening => (
                L::LinearSlipWeakening,
                InitializerKind::LinearSlipWeakening,
                FrictionLaw::LinearSlipWeakening(LswSpecialization::NoSpecialization),
                OutputKind::LinearSlipWeakening,
            ),
            K::LinearSlipWeakeningBimaterial => (
                L::LinearSlipWeakeningBimaterial,
                InitializerKind::LinearSlipWeakeningBimaterial,
                FrictionLaw::LinearSlipWeakening(LswSpecialization::Bimaterial),
                OutputKind::LinearSlipWeakeningBimaterial,
            ),
            K::ImposedSlipRatesYoffe => (
                L::ImposedSlipRatesYoffe,
                InitializerKind::ImposedSlipRatesYoffe,
                FrictionLaw::ImposedSlipRates(SourceTimeFunction::Yoffe),
                OutputKind::ImposedSlipRates,
            ),
            K::ImposedSlipRatesGaussian => (
                L::ImposedSlipRatesGaussian,
                InitializerKind::ImposedSlipRatesGaussian,
                FrictionLaw::ImposedSlipRates(SourceTimeFunction::Gaussian),
                OutputKind::ImposedSlipRates,
            ),
            K::RateAndStateAging => (
                L::RateAndState,
                InitializerKind::RateAndState,
                FrictionLaw::RateAndState(StateLaw::Aging),
                rs_output,
            ),
            K::RateAndStateSlip => (
                L::RateAndState,
                InitializerKind::RateAndState,
                FrictionLaw::RateAndState(StateLaw::Slip),
                rs_output,
            ),
            K::RateAndStateFastVelocityWeakening if tp => (
                L::RateAndStateThermalPressurization,
                InitializerKind::RateAndStateThermalPressurization,
                FrictionLaw::RateAndState(StateLaw::FastVelocityWeakening),
                rs_output,
            ),
            K::RateAndStateFastVelocityWeakening => (
                L::RateAndStateFastVelocityWeakening,
                InitializerKind::RateAndStateFastVelocity,
                FrictionLaw::RateAndState(StateLaw::FastVelocityWeakening),
                rs_output,
            ),
            K::RateAndStateVelocityWeakening | K::RateAndStateAgingNucleation => {
                error!(%kind, "friction law currently disabled");
                return Err(ConfigurationError::DisabledFrictionLaw { kind });
            }
        };

        info!(%variant, ?law, ?output, "selected friction model");
        Ok(ProductBundle::new(
            variant,
            StorageLayoutDescriptor::new(variant, layout),
            ModelInitializer::new(variant, initializer, config.clone()),
            FrictionKernel::new(variant, law, config.clone()),
            OutputManager::new(variant, output),
        ))
    }
}
