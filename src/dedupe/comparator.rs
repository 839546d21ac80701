//! Staged pairwise duplicate classifier.
//!
//! Stages run in a fixed order and the first one to reach a decision wins:
//!
//! 1. both records need a title;
//! 2. `year`, `pages`, `volume`, `number`, `isbn` must not disagree once normalised;
//! 3. two extractable DOIs decide the pair outright;
//! 4. years embedded in the titles must agree;
//! 5. two normalisable ISBNs decide the pair outright;
//! 6. near-identical titles plus matching authors make a duplicate;
//! 7. anything else is not a duplicate.

use std::sync::Arc;
use tracing::debug;

use crate::config::{ConfigError, DedupeConfig, Patterns, StringDistanceConfig};
use crate::models::{FieldValue, Reason, Reference, Verdict};
use crate::utils::{
    find_doi, get_numeric, strip_junk_words, title_years, title_years_conflict,
    AuthorSimilarity, NameListSimilarity, StringDistance, StrsimDistance,
};

/// Numeric identifying fields checked for exact agreement, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExactField {
    Year,
    Pages,
    Volume,
    Number,
    Isbn,
}

const EXACT_FIELDS: [ExactField; 5] = [
    ExactField::Year,
    ExactField::Pages,
    ExactField::Volume,
    ExactField::Number,
    ExactField::Isbn,
];

impl ExactField {
    fn value(self, reference: &Reference) -> Option<&FieldValue> {
        let value = match self {
            ExactField::Year => reference.year.as_ref(),
            ExactField::Pages => reference.pages.as_ref(),
            ExactField::Volume => reference.volume.as_ref(),
            ExactField::Number => reference.number.as_ref(),
            ExactField::Isbn => reference.isbn.as_ref(),
        };
        value.filter(|v| v.is_present())
    }

    fn reason(self) -> Reason {
        match self {
            ExactField::Year => Reason::Year,
            ExactField::Pages => Reason::Pages,
            ExactField::Volume => Reason::Volume,
            ExactField::Number => Reason::Number,
            ExactField::Isbn => Reason::Isbn,
        }
    }
}

/// Decides whether two references describe the same work
///
/// Holds only immutable settings, so one comparator can be shared freely.
#[derive(Debug, Clone)]
pub struct Comparator {
    patterns: Patterns,
    thresholds: StringDistanceConfig,
    distance: Arc<dyn StringDistance>,
    authors: Arc<dyn AuthorSimilarity>,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// Comparator with the default settings and strsim-backed capabilities
    pub fn new() -> Self {
        Self {
            patterns: Patterns::default(),
            thresholds: StringDistanceConfig::default(),
            distance: Arc::new(StrsimDistance),
            authors: Arc::new(NameListSimilarity),
        }
    }

    /// Comparator built from a resolved configuration
    pub fn from_config(config: &DedupeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patterns: config.compile()?,
            thresholds: config.string_distances,
            ..Self::new()
        })
    }

    /// Replace the string distance capability
    pub fn with_string_distance(mut self, distance: impl StringDistance + 'static) -> Self {
        self.distance = Arc::new(distance);
        self
    }

    /// Replace the author list capability
    pub fn with_author_similarity(mut self, authors: impl AuthorSimilarity + 'static) -> Self {
        self.authors = Arc::new(authors);
        self
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    pub fn thresholds(&self) -> StringDistanceConfig {
        self.thresholds
    }

    /// DOI of a reference, using this comparator's pattern
    pub fn find_doi(&self, reference: &Reference) -> Option<String> {
        find_doi(reference, &self.patterns)
    }

    /// Integer form of a numeric-looking field, using this comparator's patterns
    pub fn get_numeric(&self, value: &FieldValue) -> Option<i64> {
        get_numeric(value, &self.patterns)
    }

    /// Classify a pair of references
    pub fn compare(&self, a: &Reference, b: &Reference) -> Verdict {
        let verdict = self.evaluate(a, b);
        debug!(
            left = a.label(),
            right = b.label(),
            is_dupe = verdict.is_dupe,
            reason = %verdict.reason,
            "Compared references"
        );
        verdict
    }

    fn evaluate(&self, a: &Reference, b: &Reference) -> Verdict {
        let (title_a, title_b) = match (a.title(), b.title()) {
            (Some(title_a), Some(title_b)) => (title_a, title_b),
            _ => return Verdict::distinct(Reason::MissingTitle),
        };

        if let Some(field) = self.conflicting_field(a, b) {
            return Verdict::distinct(field.reason());
        }

        if let (Some(doi_a), Some(doi_b)) = (self.find_doi(a), self.find_doi(b)) {
            return Verdict::decided_by(doi_a == doi_b, Reason::Doi);
        }

        if title_years_conflict(&title_years(title_a), &title_years(title_b)) {
            return Verdict::distinct(Reason::Year);
        }

        let isbn_a = a.isbn.as_ref().and_then(|v| self.get_numeric(v));
        let isbn_b = b.isbn.as_ref().and_then(|v| self.get_numeric(v));
        if let (Some(isbn_a), Some(isbn_b)) = (isbn_a, isbn_b) {
            return Verdict::decided_by(isbn_a == isbn_b, Reason::Isbn);
        }

        if self.titles_close(title_a, title_b) && self.authors.authors_match(&a.authors, &b.authors)
        {
            return Verdict::dupe(Reason::TitleAuthors);
        }

        Verdict::distinct(Reason::Exhausted)
    }

    /// First exact field present on both sides whose normalised values differ
    fn conflicting_field(&self, a: &Reference, b: &Reference) -> Option<ExactField> {
        EXACT_FIELDS.into_iter().find(|field| {
            let (Some(value_a), Some(value_b)) = (field.value(a), field.value(b)) else {
                return false;
            };
            match (self.get_numeric(value_a), self.get_numeric(value_b)) {
                (Some(x), Some(y)) => x != y,
                // Unparseable on either side is inconclusive
                _ => false,
            }
        })
    }

    fn titles_close(&self, title_a: &str, title_b: &str) -> bool {
        let mut title_a = title_a.to_lowercase();
        let mut title_b = title_b.to_lowercase();
        if self.thresholds.strip_junk_words {
            title_a = strip_junk_words(&title_a, &self.patterns);
            title_b = strip_junk_words(&title_b, &self.patterns);
        }

        title_a == title_b
            || (self.distance.similarity(&title_a, &title_b) >= self.thresholds.jaro_winkler_min
                && self.distance.distance(&title_a, &title_b) <= self.thresholds.levenshtein_max)
    }
}
