use crate::models::EmployeeRecord;

/// Hard-coded roster served when neither the spreadsheet nor a fresh cache
/// is available.
pub fn fallback_records() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new(
            "N6088107",
            "LEANDRO GONÇALVES DE CARVALHO",
            "EMPRESARIAL",
            "-",
            "64%",
            "-",
        ),
        EmployeeRecord::new(
            "N5619600",
            "BRUNO COSTA BUCARD",
            "EMPRESARIAL",
            "-",
            "60%",
            "-",
        ),
    ]
}
