//! Reference model representing a bibliographic record from any import source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A loosely typed field value.
///
/// Import formats disagree on whether identifiers such as the year or the
/// volume are numbers or strings, so both shapes are accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Whether this value carries any content (empty strings count as absent)
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// A bibliographic reference record
///
/// All fields are optional. Records are never modified by the comparator or
/// the scanner; they are cloned only when a duplicate is reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// Caller-side identifier (library key, database row id, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Work title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author names in citation order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Publication year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<FieldValue>,

    /// Page range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<FieldValue>,

    /// Journal volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<FieldValue>,

    /// Journal issue number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<FieldValue>,

    /// ISBN (books) or ISSN-like identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<FieldValue>,

    /// Digital Object Identifier, bare or embedded in a longer string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Links attached to the record, any of which may carry a DOI
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

impl Reference {
    /// Create an empty reference with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns the title if it is present and non-empty
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns a short label for logs and tables (id, else title)
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or_else(|| self.title())
            .unwrap_or("<untitled>")
    }
}

/// Builder for constructing Reference objects
#[derive(Debug, Clone, Default)]
pub struct ReferenceBuilder {
    reference: Reference,
}

impl ReferenceBuilder {
    /// Create a new builder with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            reference: Reference::new(title),
        }
    }

    /// Create a builder without a title
    pub fn untitled() -> Self {
        Self::default()
    }

    /// Set the caller-side identifier
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.reference.id = Some(id.into());
        self
    }

    /// Add an author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.reference.authors.push(author.into());
        self
    }

    /// Set the full author list
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn year(mut self, year: impl Into<FieldValue>) -> Self {
        self.reference.year = Some(year.into());
        self
    }

    pub fn pages(mut self, pages: impl Into<FieldValue>) -> Self {
        self.reference.pages = Some(pages.into());
        self
    }

    pub fn volume(mut self, volume: impl Into<FieldValue>) -> Self {
        self.reference.volume = Some(volume.into());
        self
    }

    pub fn number(mut self, number: impl Into<FieldValue>) -> Self {
        self.reference.number = Some(number.into());
        self
    }

    pub fn isbn(mut self, isbn: impl Into<FieldValue>) -> Self {
        self.reference.isbn = Some(isbn.into());
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.reference.doi = Some(doi.into());
        self
    }

    /// Add a URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.reference.urls.push(url.into());
        self
    }

    /// Build the Reference
    pub fn build(self) -> Reference {
        self.reference
    }
}
