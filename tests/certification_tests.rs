/// End-to-end certification scenarios
/// Exercises the evaluator through public records the way the lookup API does
use rust_indicator_api::evaluator::{evaluate_employee, parse_indicator_value, Evaluator};
use rust_indicator_api::models::{DpaVariant, EmployeeRecord, IndicatorKind, Sector};

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_mobile_certifies_with_advisory() {
        let record = EmployeeRecord::new("N1", "ANA", "MÓVEL", "82%", "86%", "90%");
        let result = evaluate_employee(&record);

        assert!(result.etit_ok);
        assert_eq!(result.assertiveness_ok, Some(true));
        assert!(result.dpa_certifying_ok);
        assert!(!result.dpa_individual_ok);
        assert!(result.certifying);
        assert!(result.advisory_below_individual_target);
    }

    #[test]
    fn test_residential_fails_on_assertiveness() {
        let record = EmployeeRecord::new("N2", "BIA", "RESIDENCIAL", "85%", "92%", "60%");
        let result = evaluate_employee(&record);

        assert_eq!(result.assertiveness_ok, Some(false));
        assert!(!result.certifying);
    }

    #[test]
    fn test_enterprise_without_data_certifies() {
        let record = EmployeeRecord::new("N3", "CAIO", "EMPRESARIAL", "-", "-", "-");
        let result = evaluate_employee(&record);

        assert!(result.etit_ok);
        assert_eq!(result.assertiveness_ok, None);
        assert!(result.dpa_certifying_ok);
        assert!(result.certifying);
    }

    #[test]
    fn test_dpa_87_is_advisory_only() {
        let record = EmployeeRecord::new("N4", "DANI", "RESIDENCIAL", "95%", "87%", "75%");
        let result = evaluate_employee(&record);

        assert!(result.dpa_certifying_ok);
        assert!(!result.dpa_individual_ok);
        assert!(result.advisory_below_individual_target);
        assert!(result.certifying);
    }

    #[test]
    fn test_etit_below_target_blocks_certification() {
        let record = EmployeeRecord::new("N5", "EDU", "EMPRESARIAL", "89%", "95%", "-");
        let result = evaluate_employee(&record);

        assert!(!result.etit_ok);
        assert!(!result.certifying);
        assert!(!result.advisory_below_individual_target);
    }
}

#[cfg(test)]
mod boundary_tests {
    use super::*;

    #[test]
    fn test_every_threshold_is_inclusive() {
        let ev = Evaluator::default();
        let cases = [
            (IndicatorKind::Etit, Sector::Mobile, "80%"),
            (IndicatorKind::Etit, Sector::Residential, "90%"),
            (IndicatorKind::Etit, Sector::Enterprise, "90%"),
            (IndicatorKind::Etit, Sector::Unknown, "0%"),
            (IndicatorKind::Assertiveness, Sector::Mobile, "85%"),
            (IndicatorKind::Assertiveness, Sector::Residential, "70%"),
            (IndicatorKind::Assertiveness, Sector::Unknown, "0%"),
        ];

        for (kind, sector, value) in cases {
            assert!(
                ev.meets_target(&value.into(), sector, kind, DpaVariant::default()),
                "{:?}/{:?} at {}",
                kind,
                sector,
                value
            );
        }

        for sector in Sector::ALL {
            assert!(ev.meets_target(
                &"85%".into(),
                sector,
                IndicatorKind::Dpa,
                DpaVariant::Certification
            ));
            assert!(ev.meets_target(
                &"90%".into(),
                sector,
                IndicatorKind::Dpa,
                DpaVariant::Individual
            ));
        }
    }

    #[test]
    fn test_dash_is_missing_and_passes() {
        let ev = Evaluator::default();
        assert_eq!(parse_indicator_value("-"), None);

        for sector in Sector::ALL {
            for kind in [
                IndicatorKind::Etit,
                IndicatorKind::Assertiveness,
                IndicatorKind::Dpa,
            ] {
                for variant in [DpaVariant::Certification, DpaVariant::Individual] {
                    assert!(ev.meets_target(&"-".into(), sector, kind, variant));
                }
            }
        }
    }
}
