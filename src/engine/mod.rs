//! Catalog aggregation and pagination use cases.
//!
//! Two entry points, both holding a shared [`ProviderRegistry`] handle:
//!
//! - [`CatalogAggregator`] -- "get everything": fan out to every
//!   catalog-capable provider in parallel with settle-all semantics and
//!   merge the results, tolerating individual provider failure.
//! - [`CatalogPager`] -- "get more of one catalog": append the next page of
//!   a specific catalog from a specific provider, preserving the context the
//!   UI originally saw and validating pagination consistency.
//!
//! [`ProviderRegistry`]: crate::provider::ProviderRegistry

pub mod aggregate;
pub mod load_more;

use marquee_common::Capability;
use serde::Serialize;

pub use aggregate::{AggregateResult, CatalogAggregator};
pub use load_more::{CatalogPager, LoadMoreMetrics, LoadMoreRequest, LoadMoreResult};

/// A single provider's failure within a multi-provider operation.
///
/// Failures are recorded, never escalated: one broken provider must not
/// prevent other providers' catalogs from reaching the user.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    /// Identifier of the failing provider.
    pub provider_id: String,
    /// Display name of the failing provider.
    pub provider_name: String,
    /// Human-readable failure message, verbatim from the provider.
    pub error: String,
    /// Capability being exercised when the failure occurred.
    pub capability: Capability,
}
