//! Comparison verdict returned by the pairwise comparator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stage or field that settled a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    /// One of the records has no title
    #[serde(rename = "missing title")]
    MissingTitle,
    /// Year mismatch, either in the year field or among years embedded in the titles
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "pages")]
    Pages,
    #[serde(rename = "volume")]
    Volume,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "isbn")]
    Isbn,
    #[serde(rename = "doi")]
    Doi,
    /// Fuzzy title match with matching authors
    #[serde(rename = "title+authors")]
    TitleAuthors,
    /// No stage reached a decision
    #[serde(rename = "exhausted")]
    Exhausted,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::MissingTitle => "missing title",
            Reason::Year => "year",
            Reason::Pages => "pages",
            Reason::Volume => "volume",
            Reason::Number => "number",
            Reason::Isbn => "isbn",
            Reason::Doi => "doi",
            Reason::TitleAuthors => "title+authors",
            Reason::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing two references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_dupe: bool,
    pub reason: Reason,
}

impl Verdict {
    pub fn dupe(reason: Reason) -> Self {
        Self {
            is_dupe: true,
            reason,
        }
    }

    pub fn distinct(reason: Reason) -> Self {
        Self {
            is_dupe: false,
            reason,
        }
    }

    /// A verdict whose outcome is the given equality test
    pub fn decided_by(is_dupe: bool, reason: Reason) -> Self {
        Self { is_dupe, reason }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.is_dupe { "duplicate" } else { "distinct" };
        write!(f, "{} ({})", outcome, self.reason)
    }
}
