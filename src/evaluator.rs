//! Indicator evaluation.
//!
//! Missing or malformed indicator values always satisfy their target: an
//! employee with no data for an indicator is not held back by it.

use crate::models::{
    CertificationResult, DpaVariant, EmployeeRecord, IndicatorKind, IndicatorValue, Sector,
};
use crate::targets::{TargetTable, Threshold};

/// Placeholder texts that mean "no data".
const MISSING_MARKERS: [&str; 4] = ["-", "–", "—", "_"];
const MISSING_WORDS: [&str; 4] = ["não informado", "nao informado", "not informed", "n/a"];

/// True for empty text and the placeholders above, ignoring case and
/// surrounding whitespace.
pub(crate) fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        return true;
    }
    let lower = trimmed.to_lowercase();
    MISSING_WORDS.contains(&lower.as_str())
}

/// Parses indicator text such as `"87%"` or `"85,5 %"` into a number.
///
/// Returns `None` for placeholders and anything non-numeric.
pub fn parse_indicator_value(raw: &str) -> Option<f64> {
    if is_missing(raw) {
        return None;
    }

    let cleaned = raw.replace('%', "").replacen(',', ".", 1);
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Value as displayed to users; placeholders collapse to `-`.
pub fn format_display_value(raw: &str) -> String {
    if is_missing(raw) {
        "-".to_string()
    } else {
        raw.to_string()
    }
}

/// Canonicalizes free-text sector names.
///
/// Matching is by substring, with EMPRESARIAL taking priority over
/// RESIDENCIAL, which takes priority over MÓVEL.
pub fn normalize_sector(raw: &str) -> Sector {
    let upper = raw.trim().to_uppercase();

    if upper.contains("EMPRESARIAL") || upper.contains("ENTERPRISE") {
        Sector::Enterprise
    } else if upper.contains("RESIDENCIAL") || upper.contains("RESIDENTIAL") {
        Sector::Residential
    } else if upper.contains("MÓVEL") || upper.contains("MOVEL") || upper.contains("MOBILE") {
        Sector::Mobile
    } else {
        Sector::Unknown
    }
}

/// Evaluates employee records against a target table.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    targets: TargetTable,
}

impl Evaluator {
    pub fn new(targets: TargetTable) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    /// Whether `value` meets the target for `kind` in `sector`.
    ///
    /// The boundary is inclusive. `variant` only matters for DPA.
    pub fn meets_target(
        &self,
        value: &IndicatorValue,
        sector: Sector,
        kind: IndicatorKind,
        variant: DpaVariant,
    ) -> bool {
        if kind == IndicatorKind::Assertiveness && sector == Sector::Enterprise {
            return true;
        }

        let Some(parsed) = value.percent() else {
            return true;
        };

        match self.targets.threshold(kind, sector, variant) {
            Threshold::NotApplicable => true,
            Threshold::Percent(target) => parsed >= target,
        }
    }

    pub fn evaluate_employee(&self, record: &EmployeeRecord) -> CertificationResult {
        let sector = record.sector;
        let enterprise = sector == Sector::Enterprise;

        let etit_ok = self.meets_target(
            &record.etit,
            sector,
            IndicatorKind::Etit,
            DpaVariant::default(),
        );
        let assertiveness_ok = (!enterprise).then(|| {
            self.meets_target(
                &record.assertiveness,
                sector,
                IndicatorKind::Assertiveness,
                DpaVariant::default(),
            )
        });
        let dpa_certifying_ok = self.meets_target(
            &record.dpa,
            sector,
            IndicatorKind::Dpa,
            DpaVariant::Certification,
        );
        let dpa_individual_ok = self.meets_target(
            &record.dpa,
            sector,
            IndicatorKind::Dpa,
            DpaVariant::Individual,
        );

        let certifying =
            etit_ok && (enterprise || assertiveness_ok.unwrap_or(true)) && dpa_certifying_ok;

        tracing::debug!(
            matricula = %record.id,
            sector = %sector,
            etit_ok,
            ?assertiveness_ok,
            dpa_certifying_ok,
            dpa_individual_ok,
            certifying,
            "Employee evaluated"
        );

        CertificationResult {
            etit_ok,
            assertiveness_ok,
            dpa_certifying_ok,
            dpa_individual_ok,
            certifying,
            advisory_below_individual_target: dpa_certifying_ok && !dpa_individual_ok,
        }
    }
}

/// Evaluates a record against the default target table.
pub fn evaluate_employee(record: &EmployeeRecord) -> CertificationResult {
    Evaluator::default().evaluate_employee(record)
}
