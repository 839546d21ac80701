//! Notifications produced while scanning.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use super::fetch::FetchError;
use crate::models::{Reference, Verdict};

/// A duplicate pair found by the scanner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Duplicate {
    /// Input position of the first record
    pub left_index: usize,
    /// Input position of the second record
    pub right_index: usize,
    /// First record, as resolved by the fetch hook
    pub left: Reference,
    /// Second record, as resolved by the fetch hook
    pub right: Reference,
    pub verdict: Verdict,
}

/// Totals reported when a scan completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScanSummary {
    /// Number of records scanned
    pub records: usize,
    /// Number of pairs compared
    pub compared: usize,
    /// Number of duplicate pairs reported
    pub duplicates: usize,
}

/// Event emitted by a running scan, in pair order
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A pair was compared; `index` is its 0-based position among `total` pairs
    Progress { index: usize, total: usize },
    /// A pair was classified as duplicate
    Dupe(Duplicate),
    /// The scan stopped on a fault
    Error(ScanError),
    /// Every pair was compared
    End(ScanSummary),
}

impl ScanEvent {
    /// Whether this is the last event of a scan
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanEvent::Error(_) | ScanEvent::End(_))
    }
}

/// Errors that stop a scan
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    /// The fetch hook failed for the record at `index`
    #[error("Failed to resolve reference #{index}: {source}")]
    Fetch {
        index: usize,
        #[source]
        source: FetchError,
    },

    /// Nobody is listening for events anymore
    #[error("Scan aborted: event receiver dropped")]
    Aborted,

    /// The scan task panicked or was cancelled
    #[error("Scan task failed: {0}")]
    Task(String),
}

/// Receives scan notifications as they happen
///
/// Every method has a no-op default so observers implement only what they need.
pub trait ScanObserver: Send {
    fn on_progress(&mut self, _index: usize, _total: usize) {}

    fn on_dupe(&mut self, _duplicate: &Duplicate) {}

    fn on_error(&mut self, _error: &ScanError) {}

    fn on_end(&mut self, _summary: &ScanSummary) {}
}

/// Destination for scan events inside the driver
#[async_trait]
pub(crate) trait EventSink: Send {
    async fn emit(&mut self, event: ScanEvent) -> Result<(), ScanError>;
}

#[async_trait]
impl EventSink for mpsc::Sender<ScanEvent> {
    async fn emit(&mut self, event: ScanEvent) -> Result<(), ScanError> {
        self.send(event).await.map_err(|_| ScanError::Aborted)
    }
}

/// Adapts a synchronous observer to the driver
pub(crate) struct ObserverSink<'a, O: ScanObserver + ?Sized>(pub(crate) &'a mut O);

#[async_trait]
impl<O: ScanObserver + ?Sized> EventSink for ObserverSink<'_, O> {
    async fn emit(&mut self, event: ScanEvent) -> Result<(), ScanError> {
        match &event {
            ScanEvent::Progress { index, total } => self.0.on_progress(*index, *total),
            ScanEvent::Dupe(duplicate) => self.0.on_dupe(duplicate),
            ScanEvent::Error(error) => self.0.on_error(error),
            ScanEvent::End(summary) => self.0.on_end(summary),
        }
        Ok(())
    }
}
