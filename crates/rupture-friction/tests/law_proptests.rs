//! Bounds and monotonicity of the pointwise friction laws.

use proptest::prelude::*;
use rupture_friction::law;

proptest! {
    #[test]
    fn slip_weakening_stays_between_static_and_dynamic(
        mu_d in 0.1f64..0.5,
        drop in 0.0f64..0.5,
        d_c in 0.01f64..2.0,
        slip in 0.0f64..10.0,
        forced in 0.0f64..1.0,
    ) {
        let mu_s = mu_d + drop;
        let mu = law::slip_weakening_mu(mu_s, mu_d, d_c, slip, forced);
        prop_assert!(mu <= mu_s + 1e-15);
        prop_assert!(mu >= mu_d - 1e-15);
    }

    #[test]
    fn source_time_functions_are_monotone_cdfs(
        rise in 0.1f64..5.0,
        a in -1.0f64..6.0,
        b in -1.0f64..6.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for cdf in [law::yoffe_cdf as fn(f64, f64) -> f64, law::smooth_step] {
            let (f_lo, f_hi) = (cdf(lo, rise), cdf(hi, rise));
            prop_assert!((0.0..=1.0).contains(&f_lo));
            prop_assert!((0.0..=1.0).contains(&f_hi));
            prop_assert!(f_lo <= f_hi + 1e-12);
        }
    }

    #[test]
    fn aging_state_relaxes_toward_steady_state(
        theta in 1e-3f64..100.0,
        v in 1e-6f64..10.0,
        sl0 in 1e-3f64..1.0,
        dt in 0.0f64..1.0,
    ) {
        let steady = sl0 / v;
        let next = law::aging_state(theta, v, sl0, dt);
        let (lo, hi) = if theta <= steady { (theta, steady) } else { (steady, theta) };
        prop_assert!(next >= lo * (1.0 - 1e-12) && next <= hi * (1.0 + 1e-12));
    }
}
