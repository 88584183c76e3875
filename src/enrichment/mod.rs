//! Capability-keyed enrichment of media items.
//!
//! Multiple providers can each contribute a different facet (metadata,
//! images, ratings, ...) to the same logical item. [`EnrichedData`] holds
//! those contributions keyed by [`Capability`], so one provider's
//! contribution can never clobber another's unrelated facet. The only way a
//! contribution is lost is a later write to the same capability key.
//!
//! # Module layout
//!
//! - [`EnrichedData`] / [`EnrichmentResult`] -- the merge model.
//! - [`detail`] -- the media-detail coordinator that fans out per-capability
//!   provider calls and merges the results.

pub mod detail;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use marquee_common::Capability;
use serde::{Deserialize, Serialize};

pub use detail::{DetailRequest, DetailResult, MediaDetailService, MediaRef};

/// One provider's contribution for one capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// Facet this contribution covers.
    pub capability: Capability,
    /// Identifier of the contributing provider.
    pub provider_id: String,
    /// Display name of the contributing provider.
    pub provider_name: String,
    /// The contributed payload, shaped per capability.
    pub data: serde_json::Value,
    /// When the contribution was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// An item's original payload plus per-capability enrichments.
///
/// Value-semantic: [`with_enrichment`](Self::with_enrichment) is the sole
/// mutator and returns a new `EnrichedData`, leaving the receiver - and any
/// older snapshot - untouched. This is what lets a rendering layer keep an
/// old snapshot while a newer one is being assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedData<T> {
    /// The item's original payload.
    pub original: T,
    enrichments: BTreeMap<Capability, EnrichmentResult>,
    /// When the most recent enrichment was applied.
    pub enriched_at: DateTime<Utc>,
    /// Deduplicated IDs of every provider that contributed, in first-
    /// contribution order.
    pub enrichment_sources: Vec<String>,
}

impl<T> EnrichedData<T> {
    /// Wrap an original payload with an empty enrichment map.
    pub fn new(original: T) -> Self {
        Self {
            original,
            enrichments: BTreeMap::new(),
            enriched_at: Utc::now(),
            enrichment_sources: Vec::new(),
        }
    }

    /// The contribution stored for `capability`, if any.
    pub fn enrichment(&self, capability: Capability) -> Option<&EnrichmentResult> {
        self.enrichments.get(&capability)
    }

    /// Whether a contribution is stored for `capability`.
    pub fn has_enrichment(&self, capability: Capability) -> bool {
        self.enrichments.contains_key(&capability)
    }

    /// Number of capabilities with a stored contribution.
    pub fn enrichment_count(&self) -> usize {
        self.enrichments.len()
    }

    /// Capabilities with a stored contribution.
    pub fn enriched_capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.enrichments.keys().copied()
    }
}

impl<T: Clone> EnrichedData<T> {
    /// Return a new `EnrichedData` with `result` merged in.
    ///
    /// The slot for `result.capability` is overwritten (last write per
    /// capability wins); all other capabilities' contributions are carried
    /// over structurally unchanged. The contributing provider's ID is
    /// appended to `enrichment_sources` iff it is not already present.
    /// The receiver is never modified.
    #[must_use]
    pub fn with_enrichment(&self, result: EnrichmentResult) -> Self {
        let mut enrichments = self.enrichments.clone();
        let mut sources = self.enrichment_sources.clone();
        if !sources.contains(&result.provider_id) {
            sources.push(result.provider_id.clone());
        }
        enrichments.insert(result.capability, result);
        Self {
            original: self.original.clone(),
            enrichments,
            enriched_at: Utc::now(),
            enrichment_sources: sources,
        }
    }
}
