//! Bundle selection scenarios, end to end from a parameter document.

use rupture_config::{DRConfig, SimulationParameters};
use rupture_core::{ClusterId, ConfigurationError, FrictionLawKind};
use rupture_friction::{
    FrictionLaw, FrictionModelFactory, LswSpecialization, OutputKind, StateLaw, TpVariant,
};

fn from_document(doc: &str) -> Result<rupture_friction::ProductBundle, ConfigurationError> {
    let params = SimulationParameters::from_toml_str(doc)?;
    FrictionModelFactory::produce(&params.dynamic_rupture)
}

#[test]
fn linear_slip_weakening_uses_plain_kernel_and_lsw_output() {
    let bundle = from_document(
        "[dynamicrupture]\nFrictionLawKind = 16\nThermalPressurizationEnabled = 0\n",
    )
    .unwrap();
    assert_eq!(
        bundle.kernel().law(),
        FrictionLaw::LinearSlipWeakening(LswSpecialization::NoSpecialization)
    );
    assert_eq!(bundle.kernel().tp(), TpVariant::NoTP);
    assert_eq!(bundle.output().kind(), OutputKind::LinearSlipWeakening);
}

#[test]
fn aging_with_tp_uses_tp_kernel_and_tp_output() {
    let bundle = from_document(
        "[dynamicrupture]\nFrictionLawKind = 3\nThermalPressurizationEnabled = 1\n",
    )
    .unwrap();
    assert_eq!(
        bundle.kernel().law(),
        FrictionLaw::RateAndState(StateLaw::Aging)
    );
    assert_eq!(bundle.kernel().tp(), TpVariant::ThermalPressurization);
    assert_eq!(
        bundle.output().kind(),
        OutputKind::RateAndStateThermalPressurization
    );
}

#[test]
fn velocity_weakening_is_rejected_by_name() {
    let err = from_document("[dynamicrupture]\nFrictionLawKind = 7\n").unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DisabledFrictionLaw {
            kind: FrictionLawKind::RateAndStateVelocityWeakening
        }
    );
    assert!(err.to_string().contains("RateAndStateVelocityWeakening"));
}

#[test]
fn aging_nucleation_is_rejected() {
    let err = FrictionModelFactory::produce(&DRConfig::new(
        FrictionLawKind::RateAndStateAgingNucleation,
    ))
    .unwrap_err();
    assert!(matches!(err, ConfigurationError::DisabledFrictionLaw { .. }));
}

#[test]
fn unknown_kind_never_reaches_the_factory() {
    let err = from_document("[dynamicrupture]\nFrictionLawKind = 8\n").unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownFrictionLaw { .. }));
}

#[test]
fn driver_can_run_every_bundle_it_receives() {
    for kind in FrictionLawKind::ALL.into_iter().filter(|k| !k.is_disabled()) {
        for tp in [false, true] {
            let config = DRConfig::new(kind).with_thermal_pressurization(tp);
            let mut parts = FrictionModelFactory::produce(&config).unwrap().into_parts();
            let mut storage = parts.allocate_storage(3).unwrap();
            parts
                .kernel
                .evaluate(&mut storage, 0.0, 1e-3, &[0.5, 0.0, 2.0])
                .unwrap();
            parts.output.capture(1e-3, ClusterId(0), &storage).unwrap();
            assert_eq!(parts.output.frames().len(), 1);
        }
    }
}
