//! "Get everything": parallel catalog aggregation across all providers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use marquee_common::{Capability, RequestId};
use tracing::{debug, info, warn};

use super::ProviderFailure;
use crate::catalog::Catalog;
use crate::provider::ProviderRegistry;

/// Outcome of one aggregation run.
///
/// Always produced, never an `Err`: total failure is represented as zero
/// catalogs with a fully populated error list, so the caller can render a
/// "no content", "partial content", or neutral empty state as appropriate.
#[derive(Debug)]
pub struct AggregateResult {
    /// Every catalog obtained, flattened in provider-registration order.
    pub catalogs: Vec<Catalog>,
    /// Number of catalog-capable providers that were asked.
    pub total_providers: usize,
    /// Number of providers that initialized and returned catalogs.
    pub successful_providers: usize,
    /// Per-provider initialization and fetch failures.
    pub provider_errors: Vec<ProviderFailure>,
    /// Wall-clock duration of the whole run.
    pub execution_time: Duration,
    /// Correlation ID for this invocation (log correlation only).
    pub request_id: RequestId,
}

/// Use case: produce the union of all catalogs from all registered
/// catalog-capable providers, first page loaded, tolerating individual
/// provider failure.
///
/// # Example
///
/// ```rust,ignore
/// let aggregator = CatalogAggregator::new(registry.clone());
/// let result = aggregator.fetch_all().await;
/// for catalog in &result.catalogs { /* render a row */ }
/// for failure in &result.provider_errors { /* render a warning */ }
/// ```
pub struct CatalogAggregator {
    registry: Arc<ProviderRegistry>,
}

impl CatalogAggregator {
    /// Create an aggregator over `registry`.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Fetch every catalog from every catalog-capable provider.
    ///
    /// Providers are initialized in parallel, then queried in parallel;
    /// both phases settle all tasks rather than aborting on the first
    /// failure. A provider that fails either phase contributes one
    /// [`ProviderFailure`] entry and nothing else; a provider returning
    /// zero catalogs is a success. Zero registered providers yields an
    /// empty result, not an error.
    pub async fn fetch_all(&self) -> AggregateResult {
        let request_id = RequestId::new();
        let started = Instant::now();

        let providers = self.registry.catalog_providers();
        let total_providers = providers.len();

        if providers.is_empty() {
            info!(request = %request_id, "No catalog providers registered");
            return AggregateResult {
                catalogs: Vec::new(),
                total_providers: 0,
                successful_providers: 0,
                provider_errors: Vec::new(),
                execution_time: started.elapsed(),
                request_id,
            };
        }

        info!(
            request = %request_id,
            providers = total_providers,
            "Aggregating catalogs"
        );

        // Phase 1: initialize every provider in parallel, settle-all.
        let init_results = join_all(providers.iter().map(|(_, handle)| {
            let handle = handle.clone();
            async move { handle.initialize().await }
        }))
        .await;

        let mut provider_errors: Vec<ProviderFailure> = Vec::new();
        let mut ready = Vec::with_capacity(total_providers);
        for ((entry, handle), result) in providers.into_iter().zip(init_results) {
            match result {
                Ok(()) => ready.push((entry, handle)),
                Err(e) => {
                    warn!(
                        request = %request_id,
                        provider = %entry.id,
                        error = %e,
                        "Provider failed to initialize"
                    );
                    provider_errors.push(ProviderFailure {
                        provider_id: entry.id.clone(),
                        provider_name: entry.name.clone(),
                        error: e.to_string(),
                        capability: Capability::Catalog,
                    });
                }
            }
        }

        // Phase 2: fetch catalogs from every initialized provider in
        // parallel, again settling all tasks.
        let fetch_results = join_all(ready.iter().map(|(_, handle)| {
            let handle = handle.clone();
            async move { handle.get_all_catalogs().await }
        }))
        .await;

        let mut catalogs: Vec<Catalog> = Vec::new();
        let mut successful_providers = 0;
        for ((entry, _), result) in ready.into_iter().zip(fetch_results) {
            match result {
                Ok(provider_catalogs) => {
                    debug!(
                        request = %request_id,
                        provider = %entry.id,
                        catalogs = provider_catalogs.len(),
                        "Provider returned catalogs"
                    );
                    successful_providers += 1;
                    catalogs.extend(provider_catalogs);
                }
                Err(e) => {
                    warn!(
                        request = %request_id,
                        provider = %entry.id,
                        error = %e,
                        "Provider failed to return catalogs"
                    );
                    provider_errors.push(ProviderFailure {
                        provider_id: entry.id.clone(),
                        provider_name: entry.name.clone(),
                        error: e.to_string(),
                        capability: Capability::Catalog,
                    });
                }
            }
        }

        let execution_time = started.elapsed();
        info!(
            request = %request_id,
            catalogs = catalogs.len(),
            successful = successful_providers,
            failed = provider_errors.len(),
            elapsed_ms = execution_time.as_millis() as u64,
            "Aggregation complete"
        );

        AggregateResult {
            catalogs,
            total_providers,
            successful_providers,
            provider_errors,
            execution_time,
            request_id,
        }
    }
}
