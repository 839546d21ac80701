//! Pairwise duplicate detection.
//!
//! - [`Comparator`]: Staged classifier deciding whether two references are the same work
//! - [`Scanner`]: Runs the comparator over every pair of a record set
//! - [`FetchRef`]: Hook resolving each record before it is compared
//! - [`ScanEvent`] / [`ScanObserver`]: Progress, duplicate, error and completion notifications
//!
//! # Comparing two references
//!
//! ```rust
//! use refdedupe::dedupe::Comparator;
//! use refdedupe::models::{Reason, ReferenceBuilder};
//!
//! let comparator = Comparator::new();
//! let a = ReferenceBuilder::new("A Study of X").doi("10.1000/xyz123").build();
//! let b = ReferenceBuilder::new("Completely Different").doi("10.1000/xyz123").build();
//!
//! let verdict = comparator.compare(&a, &b);
//! assert!(verdict.is_dupe);
//! assert_eq!(verdict.reason, Reason::Doi);
//! ```
//!
//! # Scanning a record set
//!
//! ```rust,no_run
//! use refdedupe::dedupe::{ScanEvent, Scanner};
//! use refdedupe::models::Reference;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let records = vec![Reference::new("Paper One"), Reference::new("Paper Two")];
//! let mut handle = Scanner::default().scan_all(records);
//!
//! while let Some(event) = handle.next_event().await {
//!     match event {
//!         ScanEvent::Progress { index, total } => println!("{}/{}", index + 1, total),
//!         ScanEvent::Dupe(dupe) => println!("{} ~ {}", dupe.left_index, dupe.right_index),
//!         ScanEvent::Error(err) => eprintln!("{}", err),
//!         ScanEvent::End(summary) => println!("{} duplicates", summary.duplicates),
//!     }
//! }
//! # }
//! ```

mod comparator;
mod events;
mod fetch;
mod scanner;

pub use comparator::Comparator;
pub use events::{Duplicate, ScanError, ScanEvent, ScanObserver, ScanSummary};
pub use fetch::{FetchError, FetchRef, IdentityFetch};
pub use scanner::{ScanHandle, Scanner};
