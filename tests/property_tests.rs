/// Property-based tests using proptest
/// Tests invariants of indicator parsing and evaluation for arbitrary inputs
use proptest::prelude::*;
use rust_indicator_api::evaluator::{normalize_sector, parse_indicator_value, Evaluator};
use rust_indicator_api::models::{DpaVariant, EmployeeRecord, IndicatorKind, Sector};

fn any_sector() -> impl Strategy<Value = Sector> {
    prop::sample::select(Sector::ALL.to_vec())
}

fn any_kind() -> impl Strategy<Value = IndicatorKind> {
    prop::sample::select(vec![
        IndicatorKind::Etit,
        IndicatorKind::Assertiveness,
        IndicatorKind::Dpa,
    ])
}

// Property: parsing never panics and never yields a non-finite number
proptest! {
    #[test]
    fn parse_never_panics(raw in "\\PC*") {
        if let Some(v) = parse_indicator_value(&raw) {
            prop_assert!(v.is_finite());
        }
    }

    #[test]
    fn sector_normalization_never_panics(raw in "\\PC*") {
        let _ = normalize_sector(&raw);
    }

    #[test]
    fn percent_text_round_trips(whole in 0u32..500, frac in 0u32..10) {
        let raw = format!("{},{}%", whole, frac);
        let expected = format!("{}.{}", whole, frac).parse::<f64>().unwrap();
        prop_assert_eq!(parse_indicator_value(&raw), Some(expected));
    }
}

// Property: missing data never blocks a check
proptest! {
    #[test]
    fn unparseable_values_always_meet_target(
        raw in "[a-zA-Z _/-]{0,12}",
        sector in any_sector(),
        kind in any_kind(),
        certification in proptest::bool::ANY,
    ) {
        prop_assume!(parse_indicator_value(&raw).is_none());
        let variant = if certification { DpaVariant::Certification } else { DpaVariant::Individual };
        prop_assert!(Evaluator::default().meets_target(&raw.as_str().into(), sector, kind, variant));
    }

    #[test]
    fn enterprise_assertiveness_always_true(value in 0u32..200) {
        let raw = format!("{}%", value);
        prop_assert!(Evaluator::default().meets_target(
            &raw.as_str().into(),
            Sector::Enterprise,
            IndicatorKind::Assertiveness,
            DpaVariant::default(),
        ));
    }
}

// Property: verdict composition
proptest! {
    #[test]
    fn certifying_matches_its_definition(
        sector in any_sector(),
        etit in 0u32..=120,
        assertiveness in 0u32..=120,
        dpa in 0u32..=120,
    ) {
        let record = EmployeeRecord::new(
            "N1",
            "X",
            sector.label(),
            format!("{}%", etit).as_str(),
            format!("{}%", dpa).as_str(),
            format!("{}%", assertiveness).as_str(),
        );
        let r = Evaluator::default().evaluate_employee(&record);

        prop_assert_eq!(
            r.certifying,
            r.etit_ok && r.assertiveness_ok.unwrap_or(true) && r.dpa_certifying_ok
        );
        prop_assert_eq!(r.advisory_below_individual_target, r.dpa_certifying_ok && !r.dpa_individual_ok);
        prop_assert_eq!(r.assertiveness_ok.is_none(), sector == Sector::Enterprise);
        // Individual bar is never below the certification bar
        prop_assert!(!r.dpa_individual_ok || r.dpa_certifying_ok);
    }
}
