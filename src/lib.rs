//! # refdedupe
//!
//! Decides which pairs of bibliographic reference records describe the same
//! published work, for reference managers and systematic-review tooling that
//! merge records imported from several databases.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Reference, Verdict, etc.)
//! - [`dedupe`]: Pairwise comparator and the all-pairs scanner
//! - [`utils`]: Field extractors, similarity capabilities, pair enumeration
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal output helpers for the command-line tool
//!
//! Duplicates are reported pair by pair. Grouping transitive duplicates
//! and merging records are left to the caller.

pub mod config;
pub mod dedupe;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use dedupe::{Comparator, Scanner};
pub use models::{Reference, Verdict};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
