//! Indicator targets per sector.
//!
//! ETIT and Assertividade are keyed by sector; DPA has two bars keyed only by
//! variant. A sector with no defined target (`Sector::Unknown`) gets a zero
//! threshold, which every non-negative value satisfies.

use crate::models::{DpaVariant, IndicatorKind, Sector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A required percentage, or no requirement at all.
///
/// Serialized as a number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Threshold {
    Percent(f64),
    NotApplicable,
}

impl From<Option<f64>> for Threshold {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Threshold::NotApplicable, Threshold::Percent)
    }
}

impl From<Threshold> for Option<f64> {
    fn from(value: Threshold) -> Self {
        match value {
            Threshold::Percent(p) => Some(p),
            Threshold::NotApplicable => None,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Percent(p) => write!(f, "{}%", p),
            Threshold::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// Targets for the three known sectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectorTargets {
    pub mobile: Threshold,
    pub residential: Threshold,
    pub enterprise: Threshold,
}

impl SectorTargets {
    fn for_sector(&self, sector: Sector) -> Threshold {
        match sector {
            Sector::Mobile => self.mobile,
            Sector::Residential => self.residential,
            Sector::Enterprise => self.enterprise,
            Sector::Unknown => Threshold::Percent(0.0),
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, Threshold)> {
        [
            ("mobile", self.mobile),
            ("residential", self.residential),
            ("enterprise", self.enterprise),
        ]
        .into_iter()
    }
}

/// The two DPA bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DpaTargets {
    pub certification: f64,
    pub individual: f64,
}

/// Static mapping from (indicator, sector) to a required percentage.
///
/// Deserialization goes through the same validation as [`TargetTable::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTargetTable")]
pub struct TargetTable {
    etit: SectorTargets,
    assertiveness: SectorTargets,
    dpa: DpaTargets,
}

/// Unvalidated wire shape of [`TargetTable`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTargetTable {
    etit: SectorTargets,
    assertiveness: SectorTargets,
    dpa: DpaTargets,
}

impl TryFrom<RawTargetTable> for TargetTable {
    type Error = anyhow::Error;

    fn try_from(raw: RawTargetTable) -> Result<Self, Self::Error> {
        TargetTable::new(raw.etit, raw.assertiveness, raw.dpa)
    }
}

impl Default for TargetTable {
    fn default() -> Self {
        Self {
            etit: SectorTargets {
                mobile: Threshold::Percent(80.0),
                residential: Threshold::Percent(90.0),
                enterprise: Threshold::Percent(90.0),
            },
            assertiveness: SectorTargets {
                mobile: Threshold::Percent(85.0),
                residential: Threshold::Percent(70.0),
                enterprise: Threshold::NotApplicable,
            },
            dpa: DpaTargets {
                certification: 85.0,
                individual: 90.0,
            },
        }
    }
}

impl TargetTable {
    /// Builds a table, rejecting non-finite or negative percentages and a
    /// DPA certification bar above the individual bar.
    pub fn new(
        etit: SectorTargets,
        assertiveness: SectorTargets,
        dpa: DpaTargets,
    ) -> anyhow::Result<Self> {
        let table = Self {
            etit,
            assertiveness,
            dpa,
        };
        table.validate()?;
        Ok(table)
    }

    /// Loads a table from a JSON file with the same shape as the serialized
    /// default table.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read targets file {}: {}", path.display(), e)
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid targets file {}: {}", path.display(), e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let sector_bars = self
            .etit
            .iter()
            .map(|(s, t)| ("etit", s, t))
            .chain(self.assertiveness.iter().map(|(s, t)| ("assertiveness", s, t)));

        for (kind, sector, threshold) in sector_bars {
            if let Threshold::Percent(p) = threshold {
                check_percent(p, &format!("{}.{}", kind, sector))?;
            }
        }
        check_percent(self.dpa.certification, "dpa.certification")?;
        check_percent(self.dpa.individual, "dpa.individual")?;

        if self.dpa.certification > self.dpa.individual {
            anyhow::bail!(
                "dpa.certification ({}) must not exceed dpa.individual ({})",
                self.dpa.certification,
                self.dpa.individual
            );
        }
        Ok(())
    }

    /// Threshold for a check. `variant` only matters for DPA.
    pub fn threshold(&self, kind: IndicatorKind, sector: Sector, variant: DpaVariant) -> Threshold {
        match kind {
            IndicatorKind::Etit => self.etit.for_sector(sector),
            IndicatorKind::Assertiveness => self.assertiveness.for_sector(sector),
            IndicatorKind::Dpa => Threshold::Percent(self.dpa_target(variant)),
        }
    }

    pub fn dpa_target(&self, variant: DpaVariant) -> f64 {
        match variant {
            DpaVariant::Certification => self.dpa.certification,
            DpaVariant::Individual => self.dpa.individual,
        }
    }
}

fn check_percent(value: f64, name: &str) -> anyhow::Result<()> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{} must be a finite, non-negative percentage (got {})", name, value);
    }
    Ok(())
}
