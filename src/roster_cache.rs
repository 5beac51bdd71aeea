//! Local roster cache with integrity validation.
//!
//! The last successfully fetched roster is written to a JSON file together
//! with a SHA-256 checksum of its payload. On load the checksum is verified
//! and entries older than the allowed age are ignored.

use crate::errors::{AppError, ResultExt};
use crate::models::EmployeeRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Wrapper for cached data with integrity validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedCacheEntry {
    /// The cached payload (JSON string)
    pub data: String,
    /// SHA-256 checksum of the data (hex encoded)
    pub checksum: String,
}

impl ValidatedCacheEntry {
    pub fn new(data: String) -> Self {
        let checksum = Self::compute_checksum(&data);
        Self { data, checksum }
    }

    fn compute_checksum(data: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns true if the checksum matches the data.
    pub fn is_valid(&self) -> bool {
        Self::compute_checksum(&self.data) == self.checksum
    }

    /// Parses a serialized entry and returns its payload if the checksum holds.
    pub fn deserialize_and_validate(serialized: &str) -> Option<String> {
        let entry: ValidatedCacheEntry = serde_json::from_str(serialized).ok()?;

        if entry.is_valid() {
            Some(entry.data)
        } else {
            tracing::warn!(
                "Cache validation failed: checksum mismatch. Expected: {}, Data length: {}",
                entry.checksum,
                entry.data.len()
            );
            None
        }
    }
}

/// Cached roster payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRoster {
    pub data: Vec<EmployeeRecord>,
    pub timestamp: DateTime<Utc>,
}

/// File-backed roster cache.
#[derive(Debug, Clone)]
pub struct RosterCache {
    path: PathBuf,
}

impl RosterCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persists `records` stamped with `timestamp`.
    ///
    /// Written to a sibling temp file first and renamed into place.
    pub async fn save(
        &self,
        records: &[EmployeeRecord],
        timestamp: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let payload = serde_json::to_string(&CachedRoster {
            data: records.to_vec(),
            timestamp,
        })?;
        let entry = serde_json::to_string(&ValidatedCacheEntry::new(payload))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, entry)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("renaming into {}", self.path.display()))?;

        tracing::debug!(
            "Roster cache saved: {} records at {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Cached roster if present, intact and younger than `max_age`.
    pub async fn load_fresh(&self, max_age: Duration) -> Result<Option<CachedRoster>, AppError> {
        self.load_fresh_at(max_age, Utc::now()).await
    }

    pub async fn load_fresh_at(
        &self,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<CachedRoster>, AppError> {
        let serialized = match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No roster cache at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::CacheError(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let Some(payload) = ValidatedCacheEntry::deserialize_and_validate(&serialized) else {
            return Ok(None);
        };

        let cached: CachedRoster = match serde_json::from_str(&payload) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Roster cache payload is not a roster: {}", e);
                return Ok(None);
            }
        };

        let age = now.signed_duration_since(cached.timestamp);
        if age >= max_age {
            tracing::info!(
                "Roster cache is stale ({} min old, limit {} min)",
                age.num_minutes(),
                max_age.num_minutes()
            );
            return Ok(None);
        }

        Ok(Some(cached))
    }
}
