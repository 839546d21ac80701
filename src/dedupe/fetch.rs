//! Pluggable reference resolution.
//!
//! The scanner passes each record through a [`FetchRef`] before comparing
//! it. The default hands the record back untouched; storage-backed
//! implementations can hydrate a stub from a database or an API.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::Reference;

/// Resolves a reference before it is compared
///
/// Calls are strictly sequential: the scanner awaits each resolution before
/// starting the next, so implementations may hold a single connection or
/// apply their own rate limits without extra locking. Retries, if wanted,
/// belong inside the implementation.
#[async_trait]
pub trait FetchRef: Send + Sync {
    async fn fetch_ref(&self, reference: &Reference) -> Result<Reference, FetchError>;
}

/// Returns every reference unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFetch;

#[async_trait]
impl FetchRef for IdentityFetch {
    async fn fetch_ref(&self, reference: &Reference) -> Result<Reference, FetchError> {
        Ok(reference.clone())
    }
}

#[async_trait]
impl<F: FetchRef + ?Sized> FetchRef for Arc<F> {
    async fn fetch_ref(&self, reference: &Reference) -> Result<Reference, FetchError> {
        (**self).fetch_ref(reference).await
    }
}

/// Errors raised while resolving a reference
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The backing store has no record for this reference
    #[error("Reference not found: {0}")]
    NotFound(String),

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}
