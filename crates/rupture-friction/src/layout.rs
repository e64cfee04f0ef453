//! Per-face field layouts required by each friction kernel.

use indexmap::IndexMap;

use crate::variant::BundleVariant;

/// Names of the per-face fields.
pub mod fields {
    /// Slip rate magnitude (m/s).
    pub const SLIP_RATE: &str = "slip_rate";
    /// Accumulated slip (m).
    pub const SLIP: &str = "slip";
    /// Normal stress, compression negative (Pa).
    pub const NORMAL_STRESS: &str = "normal_stress";
    /// Current friction coefficient.
    pub const FRICTION_COEFFICIENT: &str = "friction_coefficient";
    /// Fault strength `mu * |sigma_eff|` (Pa).
    pub const STRENGTH: &str = "strength";
    /// First time the slip rate exceeded the rupture threshold (s); negative
    /// until then.
    pub const RUPTURE_TIME: &str = "rupture_time";
    /// Largest slip rate seen (m/s).
    pub const PEAK_SLIP_RATE: &str = "peak_slip_rate";
    /// Static friction coefficient.
    pub const MU_S: &str = "mu_s";
    /// Dynamic friction coefficient.
    pub const MU_D: &str = "mu_d";
    /// Critical slip distance (m).
    pub const D_C: &str = "d_c";
    /// Prakash-Clifton regularised strength (Pa).
    pub const REGULARIZED_STRENGTH: &str = "regularized_strength";
    /// Kinematic source onset time (s).
    pub const ONSET_TIME: &str = "onset_time";
    /// Kinematic source final slip (m).
    pub const TAU_S: &str = "tau_s";
    /// Kinematic source rise time (s).
    pub const RISE_TIME: &str = "rise_time";
    /// Rate-and-state state variable.
    pub const STATE_VARIABLE: &str = "state_variable";
    /// Direct-effect parameter `a`.
    pub const RS_A: &str = "rs_a";
    /// Characteristic slip distance `L` (m).
    pub const RS_SL0: &str = "rs_sl0";
    /// Weakening slip rate (m/s).
    pub const RS_SR_W: &str = "rs_sr_w";
    /// Shear-zone temperature (K).
    pub const TEMPERATURE: &str = "temperature";
    /// Pore pressure (Pa).
    pub const PRESSURE: &str = "pressure";
}

/// One per-face field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldDef {
    /// Value every face starts with before initialization.
    pub default: f64,
    /// Physical unit, for output headers.
    pub unit: &'static str,
}

impl FieldDef {
    const fn new(default: f64, unit: &'static str) -> Self {
        Self { default, unit }
    }
}

/// Family of layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Observables common to every kernel.
    Base,
    /// Linear slip weakening.
    LinearSlipWeakening,
    /// Linear slip weakening with a regularised strength.
    LinearSlipWeakeningBimaterial,
    /// Kinematic source, Yoffe source time function.
    ImposedSlipRatesYoffe,
    /// Kinematic source, smooth-step source time function.
    ImposedSlipRatesGaussian,
    /// Rate-and-state aging or slip law.
    RateAndState,
    /// Rate-and-state fast velocity weakening.
    RateAndStateFastVelocityWeakening,
    /// Fast velocity weakening with thermal pressurization.
    RateAndStateThermalPressurization,
}

/// Ordered set of per-face fields a kernel reads and writes.
///
/// Thermal-pressurization variants always carry the temperature and
/// pressure fields, whatever their base layout.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageLayoutDescriptor {
    variant: BundleVariant,
    kind: LayoutKind,
    fields: IndexMap<&'static str, FieldDef>,
}

impl StorageLayoutDescriptor {
    /// Layout of `kind` for `variant`.
    pub fn new(variant: BundleVariant, kind: LayoutKind) -> Self {
        use fields::*;

        let mut fields = IndexMap::new();
        let mut add = |name: &'static str, default: f64, unit: &'static str| {
            fields.insert(name, FieldDef::new(default, unit));
        };
        add(SLIP_RATE, 0.0, "m/s");
        add(SLIP, 0.0, "m");
        add(NORMAL_STRESS, 0.0, "Pa");
        add(FRICTION_COEFFICIENT, 0.0, "1");
        add(STRENGTH, 0.0, "Pa");
        add(RUPTURE_TIME, -1.0, "s");
        add(PEAK_SLIP_RATE, 0.0, "m/s");

        match kind {
            LayoutKind::Base => {}
            LayoutKind::LinearSlipWeakening | LayoutKind::LinearSlipWeakeningBimaterial => {
                add(MU_S, 0.0, "1");
                add(MU_D, 0.0, "1");
                add(D_C, 0.0, "m");
                if kind == LayoutKind::LinearSlipWeakeningBimaterial {
                    add(REGULARIZED_STRENGTH, 0.0, "Pa");
                }
            }
            LayoutKind::ImposedSlipRatesYoffe | LayoutKind::ImposedSlipRatesGaussian => {
                add(ONSET_TIME, 0.0, "s");
                add(TAU_S, 0.0, "m");
                add(RISE_TIME, 0.0, "s");
            }
            LayoutKind::RateAndState
            | LayoutKind::RateAndStateFastVelocityWeakening
            | LayoutKind::RateAndStateThermalPressurization => {
                add(STATE_VARIABLE, 0.0, "1");
                add(RS_A, 0.0, "1");
                add(RS_SL0, 0.0, "m");
                if kind != LayoutKind::RateAndState {
                    add(RS_SR_W, 0.0, "m/s");
                }
            }
        }

        if variant.thermal_pressurization.is_enabled() {
            add(TEMPERATURE, 0.0, "K");
            add(PRESSURE, 0.0, "Pa");
        }

        Self {
            variant,
            kind,
            fields,
        }
    }

    /// Bundle tag.
    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// Layout family.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// All fields in storage order.
    pub fn fields(&self) -> &IndexMap<&'static str, FieldDef> {
        &self.fields
    }

    /// Definition of `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Bytes of `f64` storage per fault face.
    pub fn bytes_per_face(&self) -> usize {
        self.fields.len() * std::mem::size_of::<f64>()
    }
}
