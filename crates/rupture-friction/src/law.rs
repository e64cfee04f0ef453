//! Pointwise friction formulas.
//!
//! Every function here acts on one fault face and is free of storage
//! concerns; the kernel gathers inputs, calls these and scatters results.

use std::f64::consts::PI;

use rupture_config::ThermalPressurizationParams;

/// Slip rates below this are treated as this value in rate-and-state
/// formulas, which divide by the slip rate.
pub const SLIP_RATE_FLOOR: f64 = 1e-16;

/// Slip rate above which a face counts as ruptured (m/s).
pub const RUPTURE_THRESHOLD: f64 = 1e-3;

/// Linear slip-weakening friction coefficient.
///
/// `forced` is the forced-rupture progress in `[0, 1]`; zero disables it.
pub fn slip_weakening_mu(mu_s: f64, mu_d: f64, d_c: f64, slip: f64, forced: f64) -> f64 {
    let progress = (slip.abs() / d_c).max(forced).min(1.0);
    mu_s - (mu_s - mu_d) * progress
}

/// Forced-rupture progress `min(t / t_0, 1)`; zero when `t_0 <= 0`.
pub fn forced_rupture_progress(time: f64, t_0: f64) -> f64 {
    if t_0 > 0.0 {
        (time / t_0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Prakash-Clifton relaxation of the regularised strength towards
/// `target` over `dt`.
pub fn prakash_clifton(
    strength: f64,
    target: f64,
    slip_rate: f64,
    v_star: f64,
    length: f64,
    dt: f64,
) -> f64 {
    let rate = (slip_rate.abs() + v_star) / length;
    target + (strength - target) * (-rate * dt).exp()
}

/// Aging-law state update.
pub fn aging_state(theta: f64, slip_rate: f64, sl0: f64, dt: f64) -> f64 {
    let v = slip_rate.abs().max(SLIP_RATE_FLOOR);
    let steady = sl0 / v;
    steady + (theta - steady) * (-v * dt / sl0).exp()
}

/// Slip-law state update.
pub fn slip_law_state(theta: f64, slip_rate: f64, sl0: f64, dt: f64) -> f64 {
    let v = slip_rate.abs().max(SLIP_RATE_FLOOR);
    let steady = sl0 / v;
    steady * (theta / steady).powf((-v * dt / sl0).exp())
}

/// Regularised rate-and-state friction coefficient for a state `theta`.
pub fn rate_and_state_mu(
    a: f64,
    b: f64,
    f0: f64,
    sr0: f64,
    sl0: f64,
    slip_rate: f64,
    theta: f64,
) -> f64 {
    let v = slip_rate.abs().max(SLIP_RATE_FLOOR);
    let exponent = (f0 + b * (sr0 * theta / sl0).ln()) / a;
    a * (v / (2.0 * sr0) * exponent.exp()).asinh()
}

/// Parameters of the fast-velocity-weakening law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FastVwParams {
    /// Direct effect `a`.
    pub a: f64,
    /// Evolution effect `b`.
    pub b: f64,
    /// Reference friction `f0`.
    pub f0: f64,
    /// Reference slip rate `V0`.
    pub sr0: f64,
    /// Characteristic slip `L`.
    pub sl0: f64,
    /// Fully weakened friction.
    pub mu_w: f64,
    /// Weakening slip rate.
    pub sr_w: f64,
}

impl FastVwParams {
    /// Steady-state state variable `psi_ss` at `slip_rate`.
    pub fn steady_state(&self, slip_rate: f64) -> f64 {
        let v = slip_rate.abs().max(SLIP_RATE_FLOOR);
        let f_lv = self.f0 - (self.b - self.a) * (v / self.sr0).ln();
        let mu_ss = self.mu_w + (f_lv - self.mu_w) / (1.0 + (v / self.sr_w).powi(8)).powf(0.125);
        self.a * (2.0 * self.sr0 / v * (mu_ss / self.a).sinh()).ln()
    }

    /// Relax `psi` towards the steady state over `dt`.
    pub fn update_state(&self, psi: f64, slip_rate: f64, dt: f64) -> f64 {
        let v = slip_rate.abs().max(SLIP_RATE_FLOOR);
        let steady = self.steady_state(v);
        steady + (psi - steady) * (-v * dt / self.sl0).exp()
    }

    /// Friction coefficient for state `psi`.
    pub fn mu(&self, psi: f64, slip_rate: f64) -> f64 {
        let v = slip_rate.abs().max(SLIP_RATE_FLOOR);
        self.a * (v / (2.0 * self.sr0) * (psi / self.a).exp()).asinh()
    }
}

/// Yoffe-type cumulative source time function on `[0, 1]`.
pub fn yoffe_cdf(time: f64, rise_time: f64) -> f64 {
    if time <= 0.0 {
        return 0.0;
    }
    if time >= rise_time {
        return 1.0;
    }
    let x = time / rise_time;
    2.0 / PI * ((x * (1.0 - x)).sqrt() + x.sqrt().asin())
}

/// Smooth step from 0 to 1 over `[0, rise_time]`.
pub fn smooth_step(time: f64, rise_time: f64) -> f64 {
    if time <= 0.0 {
        return 0.0;
    }
    if time >= rise_time {
        return 1.0;
    }
    let shifted = time - rise_time;
    (shifted * shifted / (time * (time - 2.0 * rise_time))).exp()
}

/// Adiabatic undrained heating: returns `(temperature, pressure)` after a
/// step with frictional work `strength * slip_rate`.
pub fn thermal_pressurization(
    temperature: f64,
    pressure: f64,
    strength: f64,
    slip_rate: f64,
    dt: f64,
    tp: &ThermalPressurizationParams,
) -> (f64, f64) {
    let heating =
        strength.abs() * slip_rate.abs() * dt / (tp.heat_capacity * 2.0 * tp.half_width);
    (temperature + heating, pressure + tp.undrained_response * heating)
}

/// Effective normal stress; never tensile.
pub fn effective_normal_stress(normal_stress: f64, pressure: f64) -> f64 {
    (normal_stress + pressure).min(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn slip_weakening_limits() {
        assert_eq!(slip_weakening_mu(0.6, 0.4, 0.4, 0.0, 0.0), 0.6);
        assert!(close(slip_weakening_mu(0.6, 0.4, 0.4, 0.2, 0.0), 0.5, 1e-12));
        assert_eq!(slip_weakening_mu(0.6, 0.4, 0.4, 5.0, 0.0), 0.4);
        assert_eq!(slip_weakening_mu(0.6, 0.4, 0.4, 0.0, 1.0), 0.4);
    }

    #[test]
    fn forced_rupture_disabled_without_t0() {
        assert_eq!(forced_rupture_progress(3.0, 0.0), 0.0);
        assert_eq!(forced_rupture_progress(0.5, 1.0), 0.5);
        assert_eq!(forced_rupture_progress(3.0, 1.0), 1.0);
    }

    #[test]
    fn aging_state_is_stationary_at_steady_state() {
        let theta = 0.02 / 1e-3;
        assert!(close(aging_state(theta, 1e-3, 0.02, 0.1), theta, 1e-12));
        assert!(close(slip_law_state(theta, 1e-3, 0.02, 0.1), theta, 1e-12));
    }

    #[test]
    fn state_relaxes_towards_steady_state() {
        let steady = 0.02 / 1.0;
        let theta = aging_state(1.0, 1.0, 0.02, 10.0);
        assert!(close(theta, steady, 1e-9));
        let theta = slip_law_state(1.0, 1.0, 0.02, 10.0);
        assert!(close(theta, steady, 1e-9));
    }

    #[test]
    fn rate_and_state_mu_at_reference() {
        // At V = V0 and steady state, mu is close to f0.
        let mu = rate_and_state_mu(0.01, 0.014, 0.6, 1e-6, 0.02, 1e-6, 0.02 / 1e-6);
        assert!(close(mu, 0.6, 1e-6));
    }

    #[test]
    fn fast_weakening_drops_to_mu_w() {
        let p = FastVwParams {
            a: 0.01,
            b: 0.014,
            f0: 0.6,
            sr0: 1e-6,
            sl0: 0.02,
            mu_w: 0.1,
            sr_w: 0.1,
        };
        let fast = 10.0;
        let psi = p.steady_state(fast);
        assert!(p.mu(psi, fast) < 0.15);
        let slow = 1e-6;
        let psi = p.steady_state(slow);
        assert!(close(p.mu(psi, slow), 0.6, 1e-3));
    }

    #[test]
    fn source_time_functions_span_unit_interval() {
        for stf in [yoffe_cdf as fn(f64, f64) -> f64, smooth_step] {
            assert_eq!(stf(-1.0, 2.0), 0.0);
            assert_eq!(stf(2.0, 2.0), 1.0);
            let mut last = 0.0;
            for i in 1..20 {
                let v = stf(f64::from(i) * 0.1, 2.0);
                assert!(v >= last && v <= 1.0);
                last = v;
            }
        }
        assert!(close(yoffe_cdf(1.0, 2.0), 0.5 + 1.0 / PI, 1e-12));
    }

    #[test]
    fn heating_raises_temperature_and_pressure() {
        let tp = ThermalPressurizationParams::default();
        let (t, p) = thermal_pressurization(400.0, 0.0, 60e6, 1.0, 1e-3, &tp);
        assert!(t > 400.0);
        assert!(close(p, tp.undrained_response * (t - 400.0), 1e-12));
        assert_eq!(effective_normal_stress(-10e6, 20e6), 0.0);
    }
}
