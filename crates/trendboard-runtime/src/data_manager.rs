//! Cached record store for the dashboard runtime.
//!
//! Wraps [`try_load_records`] so the CSV is fetched once per load. Callers use
//! [`DataManager::get_records`] to obtain the shared record sequence; a forced
//! refresh re-fetches. A failed fetch is logged, remembered in
//! [`DataManager::last_error`], and leaves an empty sequence behind.

use std::sync::Arc;
use std::time::{Duration, Instant};

use trendboard_core::models::Record;
use trendboard_data::reader::{try_load_records, DataSource, ParseOptions};

/// Fetch-once holder of the parsed record sequence.
///
/// # Example
/// ```no_run
/// use trendboard_data::reader::{DataSource, ParseOptions};
/// use trendboard_runtime::data_manager::DataManager;
///
/// # async fn demo() {
/// let source = DataSource::parse("data/layoffs.csv");
/// let mut mgr = DataManager::new(source, ParseOptions::default());
/// let records = mgr.get_records(false).await;
/// println!("{} layoff events", records.len());
/// # }
/// ```
pub struct DataManager {
    source: DataSource,
    options: ParseOptions,
    /// Most recently loaded records; `Some(empty)` after a failed load.
    records: Option<Arc<Vec<Record>>>,
    /// When `records` was last populated.
    loaded_at: Option<Instant>,
    last_error: Option<String>,
}

impl DataManager {
    pub fn new(source: DataSource, options: ParseOptions) -> Self {
        Self {
            source,
            options,
            records: None,
            loaded_at: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the loaded records, fetching them on first use.
    ///
    /// When `force_refresh` is `true` the source is fetched again even if a
    /// previous load exists. There is no retry: a failure yields an empty
    /// sequence.
    pub async fn get_records(&mut self, force_refresh: bool) -> Arc<Vec<Record>> {
        if !force_refresh {
            if let Some(records) = &self.records {
                tracing::debug!("returning cached records");
                return Arc::clone(records);
            }
        }

        let records = match try_load_records(&self.source, &self.options).await {
            Ok(records) => {
                tracing::info!(
                    records = records.len(),
                    source = %self.source,
                    "layoff data loaded"
                );
                self.last_error = None;
                records
            }
            Err(e) => {
                tracing::warn!(error = %e, source = %self.source, "could not load layoff data");
                self.last_error = Some(e.to_string());
                Vec::new()
            }
        };

        let records = Arc::new(records);
        self.records = Some(Arc::clone(&records));
        self.loaded_at = Some(Instant::now());
        records
    }

    /// Drop the loaded records so the next [`get_records`](Self::get_records)
    /// call fetches.
    pub fn invalidate(&mut self) {
        self.records = None;
        self.loaded_at = None;
        tracing::debug!("record cache invalidated");
    }

    /// Time since the last load, or `None` before the first one.
    pub fn age(&self) -> Option<Duration> {
        self.loaded_at.map(|ts| ts.elapsed())
    }

    /// Message of the last failed load, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const HEADER: &str = "Company,Location HQ,# Laid Off,Date\n";

    fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("layoffs.csv");
        std::fs::write(&path, format!("{HEADER}{body}")).unwrap();
        path
    }

    fn manager_for(path: PathBuf) -> DataManager {
        DataManager::new(DataSource::File(path), ParseOptions::default())
    }

    #[tokio::test]
    async fn test_nothing_loaded_initially() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_for(write_csv(&dir, "Acme,Austin,10,2023-01-01\n"));
        assert!(mgr.age().is_none());
        assert!(mgr.last_error().is_none());
    }

    #[tokio::test]
    async fn test_first_call_loads_records() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager_for(write_csv(
            &dir,
            "Acme,Austin,10,2023-01-01\nBeta,Seattle,5,2023-01-02\n",
        ));

        let records = mgr.get_records(false).await;
        assert_eq!(records.len(), 2);
        assert!(mgr.age().is_some());
        assert!(mgr.last_error().is_none());
    }

    #[tokio::test]
    async fn test_second_call_returns_cached_records() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager_for(write_csv(&dir, "Acme,Austin,10,2023-01-01\n"));

        let first = mgr.get_records(false).await;
        // Changes on disk are not seen without a forced refresh.
        write_csv(&dir, "Acme,Austin,10,2023-01-01\nBeta,Seattle,5,2023-01-02\n");
        let second = mgr.get_records(false).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_refetches() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager_for(write_csv(&dir, "Acme,Austin,10,2023-01-01\n"));

        mgr.get_records(false).await;
        write_csv(&dir, "Acme,Austin,10,2023-01-01\nBeta,Seattle,5,2023-01-02\n");
        let refreshed = mgr.get_records(true).await;

        assert_eq!(refreshed.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_empty_with_error() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager_for(dir.path().join("absent.csv"));

        let records = mgr.get_records(false).await;
        assert!(records.is_empty());
        let error = mgr.last_error().expect("error recorded");
        assert!(error.contains("absent.csv"));

        // The failed load counts as loaded; no silent retry.
        assert!(mgr.age().is_some());
    }

    #[tokio::test]
    async fn test_successful_reload_clears_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layoffs.csv");
        let mut mgr = manager_for(path.clone());

        mgr.get_records(false).await;
        assert!(mgr.last_error().is_some());

        std::fs::write(&path, format!("{HEADER}Acme,Austin,10,2023-01-01\n")).unwrap();
        let records = mgr.get_records(true).await;
        assert_eq!(records.len(), 1);
        assert!(mgr.last_error().is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let dir = TempDir::new().unwrap();
        let mut mgr = manager_for(write_csv(&dir, "Acme,Austin,10,2023-01-01\n"));

        mgr.get_records(false).await;
        assert!(mgr.age().is_some());

        mgr.invalidate();
        assert!(mgr.age().is_none());
        assert_eq!(mgr.get_records(false).await.len(), 1);
    }
}
