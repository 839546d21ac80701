//! Core data models for references and comparison verdicts.

mod reference;
mod verdict;

pub use reference::{FieldValue, Reference, ReferenceBuilder};
pub use verdict::{Reason, Verdict};
