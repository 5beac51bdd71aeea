use crate::evaluator::{format_display_value, Evaluator};
use crate::models::{
    CertificationResult, DpaVariant, EmployeeRecord, EmployeeReport, IndicatorKind, IndicatorLine,
};
use crate::targets::Threshold;
use chrono::{DateTime, Local, Utc};

/// Formats the "last updated" label as `dd/mm HH:MM` in local time, or `-`
/// when the data was never downloaded.
pub fn format_update_label(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.with_timezone(&Local).format("%d/%m %H:%M").to_string(),
        None => "-".to_string(),
    }
}

fn target_text(threshold: Threshold) -> String {
    match threshold {
        Threshold::Percent(_) => format!("Meta: {}", threshold),
        Threshold::NotApplicable => "Não se aplica".to_string(),
    }
}

/// Builds the lookup response for one employee.
pub fn build_report(
    evaluator: &Evaluator,
    record: &EmployeeRecord,
    loaded_at: Option<DateTime<Utc>>,
) -> EmployeeReport {
    let result = evaluator.evaluate_employee(record);
    let targets = evaluator.targets();
    let sector = record.sector;

    let etit_target = target_text(targets.threshold(
        IndicatorKind::Etit,
        sector,
        DpaVariant::default(),
    ));

    let assertiveness_line = match result.assertiveness_ok {
        None => IndicatorLine {
            indicator: IndicatorKind::Assertiveness.label().to_string(),
            value: "N/A".to_string(),
            ok: None,
            target: target_text(Threshold::NotApplicable),
        },
        Some(ok) => IndicatorLine {
            indicator: IndicatorKind::Assertiveness.label().to_string(),
            value: format_display_value(record.assertiveness.as_str()),
            ok: Some(ok),
            target: target_text(targets.threshold(
                IndicatorKind::Assertiveness,
                sector,
                DpaVariant::default(),
            )),
        },
    };

    let individual = targets.threshold(IndicatorKind::Dpa, sector, DpaVariant::Individual);
    let certification = targets.threshold(IndicatorKind::Dpa, sector, DpaVariant::Certification);

    let indicators = vec![
        IndicatorLine {
            indicator: IndicatorKind::Etit.label().to_string(),
            value: format_display_value(record.etit.as_str()),
            ok: Some(result.etit_ok),
            target: etit_target,
        },
        assertiveness_line,
        IndicatorLine {
            indicator: IndicatorKind::Dpa.label().to_string(),
            value: format_display_value(record.dpa.as_str()),
            ok: Some(result.dpa_individual_ok),
            target: format!(
                "Meta Individual: {}, Certificação: {}",
                individual, certification
            ),
        },
    ];

    EmployeeReport {
        matricula: record.id.clone(),
        name: record.name.clone(),
        sector: sector.label().to_string(),
        indicators,
        result,
        verdict: verdict_text(&result).to_string(),
        advisory: result.advisory_below_individual_target.then(|| {
            format!(
                "Certificando, mas abaixo da meta individual ({})",
                individual
            )
        }),
        data_updated_at: format_update_label(loaded_at),
    }
}

pub fn verdict_text(result: &CertificationResult) -> &'static str {
    if result.certifying {
        "Certificando"
    } else {
        "Não certificando"
    }
}
