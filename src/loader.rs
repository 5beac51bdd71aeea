//! Roster loading with a single cache+fallback tier.
//!
//! Order on every refresh: remote workbook, then the local cache if it is
//! fresh enough, then the built-in fallback roster. A refresh always ends
//! with a new snapshot published to the store.

use crate::config::Config;
use crate::errors::AppError;
use crate::fallback::fallback_records;
use crate::models::{EmployeeRecord, RefreshOutcome, RosterSource};
use crate::roster::{RosterSnapshot, RosterStore};
use crate::roster_cache::RosterCache;
use crate::sheet::{parse_roster_rows, parse_workbook};
use crate::sheet_client::SheetClient;
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub struct RosterLoader {
    client: SheetClient,
    cache: RosterCache,
    cache_max_age: chrono::Duration,
    store: Arc<RosterStore>,
    refresh_lock: Mutex<()>,
}

impl RosterLoader {
    pub fn new(
        client: SheetClient,
        cache: RosterCache,
        cache_max_age: Duration,
        store: Arc<RosterStore>,
    ) -> Self {
        let cache_max_age = chrono::Duration::from_std(cache_max_age).unwrap_or_else(|_| {
            tracing::warn!("Cache max age out of range, using 1 hour");
            chrono::Duration::hours(1)
        });

        Self {
            client,
            cache,
            cache_max_age,
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config, store: Arc<RosterStore>) -> Result<Self, AppError> {
        let client = SheetClient::new(config.sheet_url.clone(), config.request_timeout)?;
        Ok(Self::new(
            client,
            RosterCache::new(config.cache_path.clone()),
            config.cache_max_age,
            store,
        ))
    }

    /// Downloads and parses the workbook.
    async fn load_remote(&self) -> Result<Vec<EmployeeRecord>, AppError> {
        let bytes = self.client.fetch_workbook().await?;

        let rows = tokio::task::spawn_blocking(move || parse_workbook(bytes))
            .await
            .map_err(|e| AppError::InternalError(format!("Workbook decode task failed: {}", e)))??;

        let records = parse_roster_rows(&rows)?;
        if records.is_empty() {
            return Err(AppError::ParseError(
                "Sheet has no employee rows".to_string(),
            ));
        }
        Ok(records)
    }

    /// Runs one refresh and publishes the resulting snapshot.
    ///
    /// Never fails: remote errors degrade to the cache, then the fallback.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;

        let (snapshot, message) = match self.load_remote().await {
            Ok(records) => {
                let now = Utc::now();
                if let Err(e) = self.cache.save(&records, now).await {
                    tracing::warn!("Failed to write roster cache: {}", e);
                }
                let snapshot = RosterSnapshot::from_records(records, RosterSource::Remote, Some(now));
                let message = format!("✓ Dados atualizados: {} registros", snapshot.len());
                (snapshot, message)
            }
            Err(e) => {
                tracing::error!("Failed to load roster from spreadsheet: {}", e);
                self.degraded_snapshot().await
            }
        };

        let outcome = RefreshOutcome {
            source: snapshot.source(),
            record_count: snapshot.len(),
            loaded_at: snapshot.loaded_at(),
            message,
        };
        self.store.replace(snapshot).await;

        tracing::info!(
            source = ?outcome.source,
            records = outcome.record_count,
            "{}",
            outcome.message
        );
        outcome
    }

    async fn degraded_snapshot(&self) -> (RosterSnapshot, String) {
        match self.cache.load_fresh(self.cache_max_age).await {
            Ok(Some(cached)) => {
                let message = format!(
                    "Usando dados em cache (última atualização: {})",
                    format_time_of_day(cached.timestamp)
                );
                let snapshot = RosterSnapshot::from_records(
                    cached.data,
                    RosterSource::Cache,
                    Some(cached.timestamp),
                );
                return (snapshot, message);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Roster cache unavailable: {}", e),
        }

        // Built-in data was never downloaded, so it carries no update time.
        let snapshot =
            RosterSnapshot::from_records(fallback_records(), RosterSource::Fallback, None);
        (
            snapshot,
            "⚠ Usando dados locais (erro na planilha)".to_string(),
        )
    }
}

fn format_time_of_day(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Spawns the periodic refresh loop.
///
/// The first run happens one `interval` after spawning; callers are expected
/// to have performed the initial load themselves.
pub fn spawn_refresh_task(loader: Arc<RosterLoader>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            tracing::debug!("Periodic roster refresh");
            loader.refresh().await;
        }
    })
}
