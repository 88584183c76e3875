//! Typed ID wrappers for type safety across marquee.
//!
//! This module provides newtype wrappers around UUIDs so that correlation
//! identifiers cannot be confused with other stringly-typed IDs such as
//! provider or catalog IDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single fetch request.
///
/// A fresh `RequestId` is stamped on every aggregation or load-more
/// invocation and on every page transition; it exists for log correlation
/// only and is never used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
