//! Async dashboard orchestrator.
//!
//! Runs a [`DataManager`] in a tokio task, computes [`DashboardViews`] for the
//! current filter and sends [`DashboardData`] snapshots through an `mpsc`
//! channel. The caller steers the task through a [`DashboardHandle`]: filter
//! changes recompute from the cached records, a reload re-fetches.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use trendboard_core::models::{Record, RecordFilter};
use trendboard_data::analysis::{
    available_industries, available_years, DashboardViews, ViewLimits,
};
use trendboard_data::reader::{DataSource, ParseOptions};

use crate::data_manager::DataManager;

/// Snapshot buffer; a slow consumer does not stall the task.
const SNAPSHOT_BUFFER: usize = 16;
const COMMAND_BUFFER: usize = 8;

// ── Public types ──────────────────────────────────────────────────────────────

/// One dashboard snapshot forwarded to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub views: DashboardViews,
    /// Years present in the unfiltered records, newest first.
    pub available_years: Vec<i32>,
    /// Industries present in the unfiltered records, alphabetical.
    pub available_industries: Vec<String>,
    /// Record count before filtering.
    pub total_records: usize,
    pub source: String,
    /// Message of the last failed load, if the current data came from one.
    pub last_error: Option<String>,
}

/// Requests accepted by the running orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Fetch the source again and recompute.
    Reload,
    /// Recompute the views for a new filter from the cached records.
    SetFilter(RecordFilter),
}

// ── DashboardOrchestrator ─────────────────────────────────────────────────────

/// Background dashboard coordinator.
///
/// Call [`DashboardOrchestrator::start`] to load the data in a dedicated tokio
/// task and receive a channel endpoint for [`DashboardData`] updates.
pub struct DashboardOrchestrator {
    source: DataSource,
    options: ParseOptions,
    filter: RecordFilter,
    limits: ViewLimits,
}

impl DashboardOrchestrator {
    pub fn new(source: DataSource, options: ParseOptions) -> Self {
        Self {
            source,
            options,
            filter: RecordFilter::default(),
            limits: ViewLimits::default(),
        }
    }

    /// Filter applied to the first snapshot.
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_limits(mut self, limits: ViewLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Start the dashboard task.
    ///
    /// The task loads the records once, sends the first snapshot, then waits
    /// for commands. It exits when either the receiver or every handle is
    /// dropped.
    pub fn start(self) -> (mpsc::Receiver<DashboardData>, DashboardHandle) {
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let handle = tokio::spawn(async move {
            self.run(tx, command_rx).await;
        });

        (rx, DashboardHandle { commands, handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn run(
        mut self,
        tx: mpsc::Sender<DashboardData>,
        mut commands: mpsc::Receiver<DashboardCommand>,
    ) {
        let mut data_manager = DataManager::new(self.source.clone(), self.options.clone());
        let mut records = data_manager.get_records(true).await;

        if !self.publish(&records, &data_manager, &tx).await {
            return;
        }

        while let Some(command) = commands.recv().await {
            tracing::debug!(?command, "dashboard command received");
            match command {
                DashboardCommand::Reload => {
                    records = data_manager.get_records(true).await;
                }
                DashboardCommand::SetFilter(filter) => {
                    self.filter = filter;
                }
            }

            if !self.publish(&records, &data_manager, &tx).await {
                return;
            }
        }

        tracing::debug!("command channel closed; exiting dashboard task");
    }

    /// Compute and send one snapshot. Returns `false` once the receiver is gone.
    async fn publish(
        &self,
        records: &Arc<Vec<Record>>,
        data_manager: &DataManager,
        tx: &mpsc::Sender<DashboardData>,
    ) -> bool {
        let snapshot = DashboardData {
            views: DashboardViews::compute(records, &self.filter, &self.limits),
            available_years: available_years(records),
            available_industries: available_industries(records),
            total_records: records.len(),
            source: data_manager.source().to_string(),
            last_error: data_manager.last_error().map(str::to_string),
        };

        if let Err(e) = tx.send(snapshot).await {
            tracing::debug!(error = %e, "dashboard receiver dropped");
            return false;
        }
        true
    }
}

// ── DashboardHandle ───────────────────────────────────────────────────────────

/// Control endpoint of the background dashboard task.
pub struct DashboardHandle {
    commands: mpsc::Sender<DashboardCommand>,
    handle: tokio::task::JoinHandle<()>,
}

impl DashboardHandle {
    /// Ask the task to re-fetch the source. Returns `false` if it has exited.
    pub async fn reload(&self) -> bool {
        self.send(DashboardCommand::Reload).await
    }

    /// Ask the task to recompute for `filter`. Returns `false` if it has exited.
    pub async fn set_filter(&self, filter: RecordFilter) -> bool {
        self.send(DashboardCommand::SetFilter(filter)).await
    }

    /// Immediately abort the dashboard task.
    pub fn abort(&self) {
        self.handle.abort();
    }

    async fn send(&self, command: DashboardCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
