use crate::models::{normalize_id, EmployeeRecord, RosterSource};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Immutable roster keyed by normalized matrícula.
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    records: HashMap<String, EmployeeRecord>,
    source: RosterSource,
    /// When the data was downloaded from the spreadsheet. `None` for the
    /// built-in roster, which was never downloaded.
    loaded_at: Option<DateTime<Utc>>,
}

impl RosterSnapshot {
    /// Builds a snapshot. Records with an empty ID are dropped; on duplicate
    /// IDs the later record wins.
    pub fn from_records(
        records: Vec<EmployeeRecord>,
        source: RosterSource,
        loaded_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut map = HashMap::with_capacity(records.len());
        for mut record in records {
            record.id = normalize_id(&record.id);
            if record.id.is_empty() {
                continue;
            }
            if let Some(previous) = map.insert(record.id.clone(), record) {
                tracing::warn!("Duplicate matrícula {} in roster, keeping last row", previous.id);
            }
        }

        Self {
            records: map,
            source,
            loaded_at,
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, id: &str) -> Option<&EmployeeRecord> {
        self.records.get(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> RosterSource {
        self.source
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// Holder of the current snapshot.
///
/// Readers get an `Arc` to a complete snapshot; `replace` swaps the whole
/// `Arc`, so a lookup never sees a half-refreshed roster.
#[derive(Debug)]
pub struct RosterStore {
    current: RwLock<Arc<RosterSnapshot>>,
}

impl RosterStore {
    pub fn new(initial: RosterSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub async fn current(&self) -> Arc<RosterSnapshot> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, snapshot: RosterSnapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = snapshot;
    }
}
