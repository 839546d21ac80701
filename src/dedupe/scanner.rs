//! All-pairs scanner.
//!
//! Walks every unordered pair of a record set in lexicographic order,
//! resolving each side through the fetch hook, classifying it with the
//! [`Comparator`], and reporting progress and duplicates as it goes.

use futures_util::stream::Stream;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::comparator::Comparator;
use super::events::{Duplicate, EventSink, ObserverSink, ScanError, ScanEvent, ScanObserver, ScanSummary};
use super::fetch::{FetchRef, IdentityFetch};
use crate::config::{ConfigError, DedupeConfig};
use crate::models::Reference;
use crate::utils::{pair_count, PairIter};

/// Drives the comparator over every pair of a record set
///
/// Pairs are processed one at a time. The fetch hook is the only await
/// point, and the next pair is not started until the current one has been
/// compared and reported.
pub struct Scanner<F = IdentityFetch> {
    comparator: Arc<Comparator>,
    fetch: Arc<F>,
    event_buffer: usize,
}

impl<F> Clone for Scanner<F> {
    fn clone(&self) -> Self {
        Self {
            comparator: Arc::clone(&self.comparator),
            fetch: Arc::clone(&self.fetch),
            event_buffer: self.event_buffer,
        }
    }
}

impl<F> std::fmt::Debug for Scanner<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("comparator", &self.comparator)
            .field("fetch", &std::any::type_name::<F>())
            .field("event_buffer", &self.event_buffer)
            .finish()
    }
}

impl Default for Scanner<IdentityFetch> {
    fn default() -> Self {
        Self::new(Comparator::new())
    }
}

impl Scanner<IdentityFetch> {
    /// Scanner with the identity fetch hook
    pub fn new(comparator: Comparator) -> Self {
        Self {
            comparator: Arc::new(comparator),
            fetch: Arc::new(IdentityFetch),
            event_buffer: DedupeConfig::default().scan.event_buffer,
        }
    }

    /// Scanner built from a resolved configuration
    pub fn from_config(config: &DedupeConfig) -> Result<Self, ConfigError> {
        let mut scanner = Self::new(Comparator::from_config(config)?);
        scanner.event_buffer = config.scan.event_buffer;
        Ok(scanner)
    }
}

impl<F: FetchRef + 'static> Scanner<F> {
    /// Replace the fetch hook
    pub fn with_fetch<G: FetchRef + 'static>(self, fetch: G) -> Scanner<G> {
        Scanner {
            comparator: self.comparator,
            fetch: Arc::new(fetch),
            event_buffer: self.event_buffer,
        }
    }

    /// Set the capacity of the event channel used by [`Scanner::scan_all`]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Scan `records`, reporting to `observer` as each pair completes
    ///
    /// Returns the summary that was passed to `on_end`, or the error that
    /// was passed to `on_error`.
    pub async fn run<O>(&self, records: &[Reference], observer: &mut O) -> Result<ScanSummary, ScanError>
    where
        O: ScanObserver + ?Sized,
    {
        let mut sink = ObserverSink(observer);
        drive(&self.comparator, self.fetch.as_ref(), records, &mut sink).await
    }

    /// Start scanning `records` in a background task
    ///
    /// Events arrive through the returned handle. Dropping the handle stops
    /// the scan at its next notification. Must be called within a tokio
    /// runtime.
    pub fn scan_all(&self, records: Vec<Reference>) -> ScanHandle {
        let (sender, events) = mpsc::channel(self.event_buffer.max(1));
        let comparator = Arc::clone(&self.comparator);
        let fetch = Arc::clone(&self.fetch);

        let task = tokio::spawn(async move {
            let mut sender = sender;
            drive(&comparator, fetch.as_ref(), &records, &mut sender).await
        });

        ScanHandle { events, task }
    }
}

/// Sequential scan loop shared by [`Scanner::run`] and [`Scanner::scan_all`]
async fn drive<F, S>(
    comparator: &Comparator,
    fetch: &F,
    records: &[Reference],
    sink: &mut S,
) -> Result<ScanSummary, ScanError>
where
    F: FetchRef + ?Sized,
    S: EventSink + ?Sized,
{
    let total = pair_count(records.len());
    let mut summary = ScanSummary {
        records: records.len(),
        ..ScanSummary::default()
    };

    info!("Scanning {} references ({} pairs)", records.len(), total);

    for (index, (i, j)) in PairIter::new(records.len()).enumerate() {
        let left = match resolve(fetch, records, i).await {
            Ok(reference) => reference,
            Err(err) => return fail(sink, err).await,
        };
        let right = match resolve(fetch, records, j).await {
            Ok(reference) => reference,
            Err(err) => return fail(sink, err).await,
        };

        let verdict = comparator.compare(&left, &right);
        summary.compared += 1;

        trace!("Pair {}/{}: ({}, {}) -> {}", index + 1, total, i, j, verdict);
        sink.emit(ScanEvent::Progress { index, total }).await?;

        if verdict.is_dupe {
            summary.duplicates += 1;
            debug!(
                "Duplicate: #{} {:?} ~ #{} {:?} ({})",
                i,
                left.label(),
                j,
                right.label(),
                verdict.reason
            );
            sink.emit(ScanEvent::Dupe(Duplicate {
                left_index: i,
                right_index: j,
                left,
                right,
                verdict,
            }))
            .await?;
        }
    }

    info!(
        "Scan complete: {} pairs compared, {} duplicates",
        summary.compared, summary.duplicates
    );
    sink.emit(ScanEvent::End(summary)).await?;

    Ok(summary)
}

async fn resolve<F: FetchRef + ?Sized>(
    fetch: &F,
    records: &[Reference],
    index: usize,
) -> Result<Reference, ScanError> {
    fetch
        .fetch_ref(&records[index])
        .await
        .map_err(|source| ScanError::Fetch { index, source })
}

async fn fail<S: EventSink + ?Sized>(sink: &mut S, err: ScanError) -> Result<ScanSummary, ScanError> {
    warn!("Scan stopped: {}", err);
    // The error is returned even if nobody is left to receive the event
    let _ = sink.emit(ScanEvent::Error(err.clone())).await;
    Err(err)
}

/// Handle on a scan started with [`Scanner::scan_all`]
#[derive(Debug)]
pub struct ScanHandle {
    events: mpsc::Receiver<ScanEvent>,
    task: JoinHandle<Result<ScanSummary, ScanError>>,
}

impl ScanHandle {
    /// Next event, or `None` once the scan has finished and every event was read
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    /// Consume the handle as a stream of events ending with the terminal one
    pub fn into_stream(self) -> impl Stream<Item = ScanEvent> {
        let mut events = self.events;
        async_stream::stream! {
            while let Some(event) = events.recv().await {
                let terminal = event.is_terminal();
                yield event;
                if terminal {
                    break;
                }
            }
        }
    }

    /// Read every event, keeping the duplicates
    pub async fn collect_dupes(mut self) -> Result<Vec<Duplicate>, ScanError> {
        let mut dupes = Vec::new();
        while let Some(event) = self.events.recv().await {
            match event {
                ScanEvent::Dupe(duplicate) => dupes.push(duplicate),
                ScanEvent::Error(err) => return Err(err),
                ScanEvent::End(_) => return Ok(dupes),
                ScanEvent::Progress { .. } => {}
            }
        }
        self.join().await.map(|_| dupes)
    }

    /// Discard the remaining events and wait for the scan result
    pub async fn join(mut self) -> Result<ScanSummary, ScanError> {
        while self.events.recv().await.is_some() {}
        self.task
            .await
            .map_err(|e| ScanError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::FetchError;
    use crate::models::ReferenceBuilder;
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn records() -> Vec<Reference> {
        vec![
            ReferenceBuilder::new("A Study of X").doi("10.1000/xyz123").build(),
            ReferenceBuilder::new("Completely Different")
                .doi("10.1000/xyz123")
                .build(),
            ReferenceBuilder::new("Paper One").build(),
            ReferenceBuilder::new("Paper Two").build(),
        ]
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ScanObserver for Recorder {
        fn on_progress(&mut self, index: usize, total: usize) {
            self.events.push(format!("progress {}/{}", index, total));
        }

        fn on_dupe(&mut self, duplicate: &Duplicate) {
            self.events.push(format!(
                "dupe {}-{}",
                duplicate.left_index, duplicate.right_index
            ));
        }

        fn on_error(&mut self, _error: &ScanError) {
            self.events.push("error".to_string());
        }

        fn on_end(&mut self, summary: &ScanSummary) {
            self.events.push(format!("end {}", summary.duplicates));
        }
    }

    /// Fails on the nth call
    struct FailingFetch {
        calls: AtomicUsize,
        fail_at: usize,
    }

    #[async_trait]
    impl FetchRef for FailingFetch {
        async fn fetch_ref(&self, reference: &Reference) -> Result<Reference, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_at {
                Err(FetchError::Storage("connection lost".to_string()))
            } else {
                Ok(reference.clone())
            }
        }
    }

    #[tokio::test]
    async fn test_run_reports_in_pair_order() {
        let scanner = Scanner::default();
        let mut recorder = Recorder::default();

        let summary = scanner.run(&records(), &mut recorder).await.unwrap();

        assert_eq!(summary.compared, 6);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(
            recorder.events,
            vec![
                "progress 0/6",
                "dupe 0-1",
                "progress 1/6",
                "progress 2/6",
                "progress 3/6",
                "progress 4/6",
                "progress 5/6",
                "end 1",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_empty_and_single() {
        let scanner = Scanner::default();

        let mut recorder = Recorder::default();
        scanner.run(&[], &mut recorder).await.unwrap();
        assert_eq!(recorder.events, vec!["end 0"]);

        let mut recorder = Recorder::default();
        scanner
            .run(&[Reference::new("Alone")], &mut recorder)
            .await
            .unwrap();
        assert_eq!(recorder.events, vec!["end 0"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_stops_scan() {
        let scanner = Scanner::default().with_fetch(FailingFetch {
            calls: AtomicUsize::new(0),
            fail_at: 3,
        });
        let mut recorder = Recorder::default();

        let result = scanner.run(&records(), &mut recorder).await;

        // Calls 0,1 resolve pair (0,1); call 2 resolves 0, call 3 fails on record 2
        assert_eq!(
            result,
            Err(ScanError::Fetch {
                index: 2,
                source: FetchError::Storage("connection lost".to_string()),
            })
        );
        assert_eq!(recorder.events, vec!["progress 0/6", "dupe 0-1", "error"]);
    }

    #[tokio::test]
    async fn test_scan_all_collects_dupes() {
        let scanner = Scanner::default();
        let dupes = scanner.scan_all(records()).collect_dupes().await.unwrap();

        assert_eq!(dupes.len(), 1);
        assert_eq!((dupes[0].left_index, dupes[0].right_index), (0, 1));
        assert_eq!(dupes[0].left.title(), Some("A Study of X"));
    }

    #[tokio::test]
    async fn test_scan_all_stream_ends_once() {
        let scanner = Scanner::default().with_event_buffer(1);
        let events: Vec<ScanEvent> = scanner.scan_all(records()).into_stream().collect().await;

        let progress = events
            .iter()
            .filter(|e| matches!(e, ScanEvent::Progress { .. }))
            .count();
        let ends = events.iter().filter(|e| e.is_terminal()).count();

        assert_eq!(progress, 6);
        assert_eq!(ends, 1);
        assert!(matches!(events.last(), Some(ScanEvent::End(_))));
    }

    #[tokio::test]
    async fn test_scan_all_join() {
        let scanner = Scanner::default();
        let summary = scanner.scan_all(records()).join().await.unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.compared, 6);
    }

    #[tokio::test]
    async fn test_dropped_handle_aborts_scan() {
        let scanner = Scanner::default().with_event_buffer(1);
        let mut handle = scanner.scan_all(records());

        let first = handle.next_event().await;
        assert_eq!(first, Some(ScanEvent::Progress { index: 0, total: 6 }));

        let ScanHandle { events, task } = handle;
        drop(events);
        assert_eq!(task.await.unwrap(), Err(ScanError::Aborted));
    }
}
