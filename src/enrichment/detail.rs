//! Media-detail coordinator: per-capability fan-out with in-order fallback.
//!
//! Loading a detail screen means asking several capabilities (metadata,
//! images, ratings, ...) for their slice of one item. Capabilities are
//! fetched in parallel; within one capability, enrichers are tried in
//! registration order until one succeeds. A capability nobody can satisfy
//! becomes an error entry in the result, never a failure of the whole
//! detail load.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use marquee_common::{Capability, MediaType, RequestId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::EnrichedData;
use crate::engine::ProviderFailure;
use crate::provider::ProviderRegistry;

/// Identity of the item a detail load is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Whether this is a movie, series, or person.
    pub media_type: MediaType,
    /// Provider-scoped identifier of the item.
    pub media_id: String,
}

/// Parameters for one detail load.
#[derive(Debug, Clone)]
pub struct DetailRequest {
    /// The item to load detail for.
    pub media: MediaRef,
    /// Capabilities to fetch, each resolved independently.
    pub capabilities: Vec<Capability>,
}

/// Outcome of one detail load. Always produced, never an `Err`.
#[derive(Debug)]
pub struct DetailResult {
    /// The item with every successfully fetched facet merged in.
    pub data: EnrichedData<MediaRef>,
    /// Failures, one entry per provider attempt that failed on a capability
    /// nobody ended up satisfying, plus one entry per capability with no
    /// registered provider at all.
    pub errors: Vec<ProviderFailure>,
    /// Wall-clock duration of the whole load.
    pub execution_time: Duration,
    /// Correlation ID for this invocation.
    pub request_id: RequestId,
}

/// Per-capability task outcome, before merging.
enum CapabilityOutcome {
    Fetched(super::EnrichmentResult),
    Failed(Vec<ProviderFailure>),
}

/// Use case: assemble a media detail view from every capability the caller
/// asks for, without locking the item to a single provider.
pub struct MediaDetailService {
    registry: Arc<ProviderRegistry>,
}

impl MediaDetailService {
    /// Create a detail service over `registry`.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Load the requested capabilities for one item.
    ///
    /// Capabilities fan out in parallel (settle-all). Within a capability,
    /// enrichers are tried sequentially in registration order; the first
    /// success wins and earlier attempts' failures are only logged. When
    /// every enricher fails - or none is registered - the capability
    /// contributes error entries instead of data.
    pub async fn load_detail(&self, request: DetailRequest) -> DetailResult {
        let request_id = RequestId::new();
        let started = Instant::now();

        debug!(
            request = %request_id,
            media = %request.media.media_id,
            capabilities = request.capabilities.len(),
            "Loading media detail"
        );

        let outcomes = join_all(request.capabilities.iter().map(|&capability| {
            let registry = self.registry.clone();
            let media = request.media.clone();
            async move {
                (
                    capability,
                    Self::fetch_capability(&registry, &media, capability, request_id).await,
                )
            }
        }))
        .await;

        let mut data = EnrichedData::new(request.media.clone());
        let mut errors = Vec::new();
        for (capability, outcome) in outcomes {
            match outcome {
                CapabilityOutcome::Fetched(result) => {
                    data = data.with_enrichment(result);
                }
                CapabilityOutcome::Failed(failures) => {
                    warn!(
                        request = %request_id,
                        capability = %capability,
                        attempts = failures.len(),
                        "No provider satisfied capability"
                    );
                    errors.extend(failures);
                }
            }
        }

        let execution_time = started.elapsed();
        info!(
            request = %request_id,
            media = %request.media.media_id,
            enriched = data.enrichment_count(),
            failed_attempts = errors.len(),
            elapsed_ms = execution_time.as_millis() as u64,
            "Media detail load complete"
        );

        DetailResult {
            data,
            errors,
            execution_time,
            request_id,
        }
    }

    /// Try each registered enricher for one capability, in registration
    /// order, until one succeeds.
    async fn fetch_capability(
        registry: &ProviderRegistry,
        media: &MediaRef,
        capability: Capability,
        request_id: RequestId,
    ) -> CapabilityOutcome {
        let enrichers = registry.enrichers_for(capability);
        if enrichers.is_empty() {
            return CapabilityOutcome::Failed(vec![ProviderFailure {
                provider_id: "registry".into(),
                provider_name: "registry".into(),
                error: format!("no provider registered for capability {capability}"),
                capability,
            }]);
        }

        let mut failures = Vec::new();
        for enricher in enrichers {
            if let Err(e) = enricher.initialize().await {
                warn!(
                    request = %request_id,
                    provider = %enricher.id(),
                    capability = %capability,
                    error = %e,
                    "Enricher failed to initialize, trying next"
                );
                failures.push(ProviderFailure {
                    provider_id: enricher.id().to_string(),
                    provider_name: enricher.name().to_string(),
                    error: e.to_string(),
                    capability,
                });
                continue;
            }
            match enricher
                .enrich(media.media_type, &media.media_id, capability)
                .await
            {
                Ok(result) => return CapabilityOutcome::Fetched(result),
                Err(e) => {
                    warn!(
                        request = %request_id,
                        provider = %enricher.id(),
                        capability = %capability,
                        error = %e,
                        "Enricher failed, trying next"
                    );
                    failures.push(ProviderFailure {
                        provider_id: enricher.id().to_string(),
                        provider_name: enricher.name().to_string(),
                        error: e.to_string(),
                        capability,
                    });
                }
            }
        }
        CapabilityOutcome::Failed(failures)
    }
}
