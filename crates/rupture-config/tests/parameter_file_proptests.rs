//! Property tests for parameter-file reading.

use proptest::prelude::*;
use rupture_config::SimulationParameters;
use rupture_core::FrictionLawKind;

fn key_case() -> impl Strategy<Value = bool> {
    any::<bool>()
}

proptest! {
    #[test]
    fn every_known_code_reads_back(idx in 0usize..FrictionLawKind::ALL.len(), upper in key_case()) {
        let kind = FrictionLawKind::ALL[idx];
        let key = if upper { "FRICTIONLAWKIND" } else { "frictionLawKind" };
        let doc = format!("[dynamicrupture]\n{key} = {}\n", kind.code());
        let params = SimulationParameters::from_toml_str(&doc).unwrap();
        prop_assert_eq!(params.dynamic_rupture.friction_law_kind, kind);
    }

    #[test]
    fn unknown_codes_are_rejected(code in 0i64..200) {
        prop_assume!(FrictionLawKind::from_code(code).is_none());
        let doc = format!("[dynamicrupture]\nfrictionlawkind = {code}\n");
        prop_assert!(SimulationParameters::from_toml_str(&doc).is_err());
    }

    #[test]
    fn end_time_is_read_verbatim(end in 0.0f64..1e6) {
        let doc = format!("[abortcriteria]\nendtime = {end:?}\n");
        let params = SimulationParameters::from_toml_str(&doc).unwrap();
        prop_assert_eq!(params.time_stepping.end_time, end);
    }
}
