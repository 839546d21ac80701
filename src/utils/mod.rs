//! Utility modules supporting the deduplication engine.
//!
//! - [`find_doi`]: Locate a DOI in the `doi` field or, unambiguously, among the URLs
//! - [`get_numeric`]: Normalise a numeric-looking field to an integer
//! - [`title_years`]: Four digit years embedded in a title
//! - [`StringDistance`] / [`AuthorSimilarity`]: Pluggable text similarity capabilities
//! - [`PairIter`]: Constant-memory enumeration of every unordered index pair
//!
//! # Field extraction
//!
//! ```rust
//! use refdedupe::config::Patterns;
//! use refdedupe::models::{FieldValue, ReferenceBuilder};
//! use refdedupe::utils::{find_doi, get_numeric};
//!
//! let patterns = Patterns::default();
//! let reference = ReferenceBuilder::new("A Study of X")
//!     .url("https://doi.org/10.1000/xyz123")
//!     .build();
//!
//! assert_eq!(find_doi(&reference, &patterns).as_deref(), Some("10.1000/xyz123"));
//! assert_eq!(get_numeric(&FieldValue::from(" 2001 "), &patterns), Some(2001));
//! ```
//!
//! # Pair enumeration
//!
//! ```rust
//! use refdedupe::utils::{pair_count, PairIter};
//!
//! let pairs: Vec<_> = PairIter::new(3).collect();
//! assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
//! assert_eq!(pair_count(3), 3);
//! ```

mod extract;
mod pairs;
mod similarity;

pub use extract::{find_doi, get_numeric, strip_junk_words, title_years, title_years_conflict};
pub use pairs::{pair_count, PairIter};
pub use similarity::{AuthorSimilarity, NameListSimilarity, StringDistance, StrsimDistance};
