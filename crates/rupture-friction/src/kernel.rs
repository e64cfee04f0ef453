//! Friction kernels: one fault update per cluster step.

use rupture_config::DRConfig;
use rupture_core::ConsistencyFault;

use crate::law::{self, FastVwParams};
use crate::layout::fields;
use crate::storage::{FaultStorage, FieldIndex};
use crate::variant::{BundleVariant, TpVariant};

/// Specialization of the linear slip-weakening law.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LswSpecialization {
    /// Plain slip weakening.
    NoSpecialization,
    /// Prakash-Clifton regularised strength for bimaterial faults.
    Bimaterial,
}

/// Source time function of a kinematic source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceTimeFunction {
    /// Yoffe-type.
    Yoffe,
    /// Smooth step.
    Gaussian,
}

/// State evolution of a rate-and-state law.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateLaw {
    /// Aging law.
    Aging,
    /// Slip law.
    Slip,
    /// Strong velocity weakening.
    FastVelocityWeakening,
}

/// Physics update selected for a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrictionLaw {
    /// No fault: nothing to update.
    NoFault,
    /// Linear slip weakening.
    LinearSlipWeakening(LswSpecialization),
    /// Prescribed slip history.
    ImposedSlipRates(SourceTimeFunction),
    /// Rate-and-state friction.
    RateAndState(StateLaw),
}

struct Observables {
    slip_rate: FieldIndex,
    slip: FieldIndex,
    normal_stress: FieldIndex,
    mu: FieldIndex,
    strength: FieldIndex,
    rupture_time: FieldIndex,
    peak_slip_rate: FieldIndex,
}

impl Observables {
    fn resolve(storage: &FaultStorage) -> Result<Self, ConsistencyFault> {
        Ok(Self {
            slip_rate: storage.index(fields::SLIP_RATE)?,
            slip: storage.index(fields::SLIP)?,
            normal_stress: storage.index(fields::NORMAL_STRESS)?,
            mu: storage.index(fields::FRICTION_COEFFICIENT)?,
            strength: storage.index(fields::STRENGTH)?,
            rupture_time: storage.index(fields::RUPTURE_TIME)?,
            peak_slip_rate: storage.index(fields::PEAK_SLIP_RATE)?,
        })
    }

    /// Record slip rate and slip of one face at `time`.
    fn record_slip(&self, storage: &mut FaultStorage, face: usize, time: f64, v: f64, slip: f64) {
        storage.set(self.slip_rate, face, v);
        storage.set(self.slip, face, slip);
        if storage.get(self.rupture_time, face) < 0.0 && v.abs() > law::RUPTURE_THRESHOLD {
            storage.set(self.rupture_time, face, time);
        }
        let peak = storage.get(self.peak_slip_rate, face).max(v.abs());
        storage.set(self.peak_slip_rate, face, peak);
    }
}

/// The friction update of a bundle.
///
/// Stateless itself: all evolving quantities live in [`FaultStorage`].
#[derive(Clone, Debug, PartialEq)]
pub struct FrictionKernel {
    variant: BundleVariant,
    law: FrictionLaw,
    config: DRConfig,
}

impl FrictionKernel {
    /// Kernel for `law`.
    pub fn new(variant: BundleVariant, law: FrictionLaw, config: DRConfig) -> Self {
        Self {
            variant,
            law,
            config,
        }
    }

    /// Bundle tag.
    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// Physics update.
    pub fn law(&self) -> FrictionLaw {
        self.law
    }

    /// Thermal-pressurization specialization.
    pub fn tp(&self) -> TpVariant {
        self.variant.thermal_pressurization
    }

    /// Advance the fault state of every face from `time` to `time + dt`.
    ///
    /// `slip_rates` are the per-face slip rates of the step, supplied by the
    /// numerical layer. Kinematic sources compute their own and accept an
    /// empty slice.
    pub fn evaluate(
        &self,
        storage: &mut FaultStorage,
        time: f64,
        dt: f64,
        slip_rates: &[f64],
    ) -> Result<(), ConsistencyFault> {
        if storage.variant() != self.variant {
            return Err(ConsistencyFault::BundleMismatch {
                expected: self.variant.to_string(),
                part: "storage",
                found: storage.variant().to_string(),
            });
        }
        let needs_rates = !matches!(
            self.law,
            FrictionLaw::NoFault | FrictionLaw::ImposedSlipRates(_)
        );
        if needs_rates && slip_rates.len() != storage.face_count() {
            return Err(ConsistencyFault::StorageMismatch {
                field: fields::SLIP_RATE.to_owned(),
                reason: format!(
                    "{} slip rates supplied for {} faces",
                    slip_rates.len(),
                    storage.face_count()
                ),
            });
        }
        match self.law {
            FrictionLaw::NoFault => Ok(()),
            FrictionLaw::LinearSlipWeakening(spec) => {
                self.slip_weakening(spec, storage, time, dt, slip_rates)
            }
            FrictionLaw::ImposedSlipRates(stf) => self.imposed(stf, storage, time, dt),
            FrictionLaw::RateAndState(state_law) => {
                self.rate_and_state(state_law, storage, time, dt, slip_rates)
            }
        }
    }

    fn slip_weakening(
        &self,
        spec: LswSpecialization,
        storage: &mut FaultStorage,
        time: f64,
        dt: f64,
        slip_rates: &[f64],
    ) -> Result<(), ConsistencyFault> {
        let obs = Observables::resolve(storage)?;
        let mu_s = storage.index(fields::MU_S)?;
        let mu_d = storage.index(fields::MU_D)?;
        let d_c = storage.index(fields::D_C)?;
        let regularized = match spec {
            LswSpecialization::NoSpecialization => None,
            LswSpecialization::Bimaterial => Some(storage.index(fields::REGULARIZED_STRENGTH)?),
        };
        let sw = &self.config.slip_weakening;
        let pc = &self.config.prakash_clifton;
        let forced = law::forced_rupture_progress(time + dt, sw.t_0);

        for (face, &v) in slip_rates.iter().enumerate() {
            let slip = storage.get(obs.slip, face) + v.abs() * dt;
            let mu = law::slip_weakening_mu(
                storage.get(mu_s, face),
                storage.get(mu_d, face),
                storage.get(d_c, face),
                slip,
                forced,
            );
            let mut strength = mu * storage.get(obs.normal_stress, face).abs();
            if let Some(reg) = regularized {
                strength =
                    law::prakash_clifton(storage.get(reg, face), strength, v, pc.v_star, pc.length, dt);
                storage.set(reg, face, strength);
            }
            storage.set(obs.mu, face, mu);
            storage.set(obs.strength, face, strength);
            obs.record_slip(storage, face, time + dt, v, slip);
        }
        Ok(())
    }

    fn imposed(
        &self,
        stf: SourceTimeFunction,
        storage: &mut FaultStorage,
        time: f64,
        dt: f64,
    ) -> Result<(), ConsistencyFault> {
        let obs = Observables::resolve(storage)?;
        let onset = storage.index(fields::ONSET_TIME)?;
        let tau_s = storage.index(fields::TAU_S)?;
        let rise = storage.index(fields::RISE_TIME)?;
        let cdf = match stf {
            SourceTimeFunction::Yoffe => law::yoffe_cdf,
            SourceTimeFunction::Gaussian => law::smooth_step,
        };

        for face in 0..storage.face_count() {
            let local = time - storage.get(onset, face);
            let rise_time = storage.get(rise, face);
            let increment =
                storage.get(tau_s, face) * (cdf(local + dt, rise_time) - cdf(local, rise_time));
            let v = if dt > 0.0 { increment / dt } else { 0.0 };
            let slip = storage.get(obs.slip, face) + increment;
            obs.record_slip(storage, face, time + dt, v, slip);
        }
        Ok(())
    }

    fn rate_and_state(
        &self,
        state_law: StateLaw,
        storage: &mut FaultStorage,
        time: f64,
        dt: f64,
        slip_rates: &[f64],
    ) -> Result<(), ConsistencyFault> {
        let obs = Observables::resolve(storage)?;
        let state = storage.index(fields::STATE_VARIABLE)?;
        let rs_a = storage.index(fields::RS_A)?;
        let rs_sl0 = storage.index(fields::RS_SL0)?;
        let rs_sr_w = match state_law {
            StateLaw::FastVelocityWeakening => Some(storage.index(fields::RS_SR_W)?),
            StateLaw::Aging | StateLaw::Slip => None,
        };
        let tp_fields = if self.tp().is_enabled() {
            Some((
                storage.index(fields::TEMPERATURE)?,
                storage.index(fields::PRESSURE)?,
            ))
        } else {
            None
        };
        let rs = &self.config.rate_and_state;

        for (face, &v) in slip_rates.iter().enumerate() {
            let a = storage.get(rs_a, face);
            let sl0 = storage.get(rs_sl0, face);
            let old_state = storage.get(state, face);
            let (new_state, mu) = match state_law {
                StateLaw::Aging | StateLaw::Slip => {
                    let theta = if state_law == StateLaw::Aging {
                        law::aging_state(old_state, v, sl0, dt)
                    } else {
                        law::slip_law_state(old_state, v, sl0, dt)
                    };
                    let mu = law::rate_and_state_mu(a, rs.b, rs.f0, rs.sr0, sl0, v, theta);
                    (theta, mu)
                }
                StateLaw::FastVelocityWeakening => {
                    let params = FastVwParams {
                        a,
                        b: rs.b,
                        f0: rs.f0,
                        sr0: rs.sr0,
                        sl0,
                        mu_w: rs.mu_w,
                        sr_w: rs_sr_w.map_or(rs.sr_w, |idx| storage.get(idx, face)),
                    };
                    let psi = params.update_state(old_state, v, dt);
                    (psi, params.mu(psi, v))
                }
            };

            let sigma_n = storage.get(obs.normal_stress, face);
            let strength = match tp_fields {
                Some((temperature, pressure)) => {
                    let p = storage.get(pressure, face);
                    let strength = mu * law::effective_normal_stress(sigma_n, p).abs();
                    let (t_new, p_new) = law::thermal_pressurization(
                        storage.get(temperature, face),
                        p,
                        strength,
                        v,
                        dt,
                        &self.config.thermal_pressurization,
                    );
                    storage.set(temperature, face, t_new);
                    storage.set(pressure, face, p_new);
                    strength
                }
                None => mu * sigma_n.abs(),
            };

            let slip = storage.get(obs.slip, face) + v.abs() * dt;
            storage.set(state, face, new_state);
            storage.set(obs.mu, face, mu);
            storage.set(obs.strength, face, strength);
            obs.record_slip(storage, face, time + dt, v, slip);
        }
        Ok(())
    }
}
