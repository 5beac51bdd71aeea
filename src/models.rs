use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Roster Models ============

/// Organizational sector, selecting which thresholds apply to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Mobile,
    Residential,
    Enterprise,
    /// Sector text that matched none of the known sectors.
    Unknown,
}

impl Sector {
    pub const ALL: [Sector; 4] = [
        Sector::Mobile,
        Sector::Residential,
        Sector::Enterprise,
        Sector::Unknown,
    ];

    /// Canonical label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Sector::Mobile => "MÓVEL",
            Sector::Residential => "RESIDENCIAL",
            Sector::Enterprise => "EMPRESARIAL",
            Sector::Unknown => "Não informado",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The tracked performance indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Etit,
    Assertiveness,
    Dpa,
}

impl IndicatorKind {
    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Etit => "ETIT",
            IndicatorKind::Assertiveness => "Assertividade",
            IndicatorKind::Dpa => "DPA",
        }
    }
}

/// Which of the two DPA bars a check is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpaVariant {
    /// Lower bar that counts toward the certification verdict.
    Certification,
    /// Higher bar, advisory only.
    #[default]
    Individual,
}

/// Raw indicator text as it came from the spreadsheet, e.g. `"87%"` or `"-"`.
///
/// Kept as display text at rest; parsed only when evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorValue(String);

impl IndicatorValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric percentage, or `None` when the value is absent or malformed.
    pub fn percent(&self) -> Option<f64> {
        crate::evaluator::parse_indicator_value(&self.0)
    }
}

impl From<&str> for IndicatorValue {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One employee row of the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Matrícula, trimmed and upper-cased.
    pub id: String,
    pub name: String,
    pub sector: Sector,
    pub etit: IndicatorValue,
    pub dpa: IndicatorValue,
    pub assertiveness: IndicatorValue,
}

impl EmployeeRecord {
    /// Builds a record, normalizing the ID and canonicalizing free-text sector.
    pub fn new(
        id: &str,
        name: &str,
        sector: &str,
        etit: impl Into<IndicatorValue>,
        dpa: impl Into<IndicatorValue>,
        assertiveness: impl Into<IndicatorValue>,
    ) -> Self {
        Self {
            id: normalize_id(id),
            name: name.trim().to_string(),
            sector: crate::evaluator::normalize_sector(sector),
            etit: etit.into(),
            dpa: dpa.into(),
            assertiveness: assertiveness.into(),
        }
    }
}

/// Normalizes a matrícula for lookup: surrounding whitespace removed, upper-cased.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Outcome of evaluating one employee against the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationResult {
    pub etit_ok: bool,
    /// `None` when assertiveness does not apply to the sector.
    pub assertiveness_ok: Option<bool>,
    pub dpa_certifying_ok: bool,
    pub dpa_individual_ok: bool,
    pub certifying: bool,
    /// Certifying on DPA but below the individual DPA target.
    pub advisory_below_individual_target: bool,
}

/// Where the current roster snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterSource {
    Remote,
    Cache,
    Fallback,
}

// ============ API Models ============

/// Query parameters for `GET /api/v1/consulta`.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub matricula: Option<String>,
}

/// One displayed indicator line of an employee report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorLine {
    pub indicator: String,
    /// Display value; missing data is shown as `-`, n/a as `N/A`.
    pub value: String,
    /// `None` when the indicator does not apply.
    pub ok: Option<bool>,
    pub target: String,
}

/// Full lookup response for one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeReport {
    pub matricula: String,
    pub name: String,
    pub sector: String,
    pub indicators: Vec<IndicatorLine>,
    pub result: CertificationResult,
    pub verdict: String,
    pub advisory: Option<String>,
    pub data_updated_at: String,
}

/// Result of one loader run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub source: RosterSource,
    pub record_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub message: String,
}

/// Response of `GET /api/v1/roster/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStatus {
    pub source: RosterSource,
    pub record_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub updated_label: String,
}
