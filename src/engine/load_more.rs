//! "Get more of one catalog": single-provider incremental pagination.

use std::sync::Arc;
use std::time::{Duration, Instant};

use marquee_common::{Error, RequestId, Result};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogItem, PaginationInfo};
use crate::context::{CatalogContext, PageInfo};
use crate::provider::ProviderRegistry;

/// Default page size when the caller does not specify one.
const DEFAULT_LIMIT: u32 = 20;
/// Upper bound on the page size a caller may request.
const MAX_LIMIT: u32 = 100;

/// Parameters for one load-more call.
#[derive(Debug, Clone)]
pub struct LoadMoreRequest {
    /// Provider that owns the catalog.
    pub provider_id: String,
    /// Catalog to extend.
    pub catalog_id: String,
    /// 1-based page to fetch. Must be >= 1.
    pub page: u32,
    /// Items per page, 1..=100. Defaults to 20.
    pub limit: Option<u32>,
    /// Context the UI originally saw, so repeated load-more calls chain off
    /// the same provenance instead of the latest fetch's.
    pub original_context: Option<CatalogContext>,
    /// Pagination the UI originally saw, used for consistency validation.
    pub original_pagination: Option<PaginationInfo>,
}

impl LoadMoreRequest {
    /// Build a request with defaults for the optional fields.
    pub fn new(provider_id: impl Into<String>, catalog_id: impl Into<String>, page: u32) -> Self {
        Self {
            provider_id: provider_id.into(),
            catalog_id: catalog_id.into(),
            page,
            limit: None,
            original_context: None,
            original_pagination: None,
        }
    }
}

/// Timing and volume measurements for one load-more call.
#[derive(Debug, Clone)]
pub struct LoadMoreMetrics {
    /// Wall-clock duration of the whole call.
    pub execution_time: Duration,
    /// Time spent resolving the provider in the registry.
    pub provider_lookup_time: Duration,
    /// Time spent in the provider's item and snapshot fetches.
    pub catalog_fetch_time: Duration,
    /// Number of items returned.
    pub items_loaded: usize,
    /// Always `false`. The engine performs no caching and the provider
    /// contract carries no cache signal; the field is reserved so callers
    /// recording metrics keep a stable shape if one is ever threaded through.
    pub was_cached: bool,
}

/// Outcome of one successful load-more call.
#[derive(Debug)]
pub struct LoadMoreResult {
    /// The freshly loaded items, in provider order. The caller appends them
    /// to its catalog; the engine performs no catalog mutation itself.
    pub items: Vec<CatalogItem>,
    /// Authoritative pagination metadata after this page.
    pub pagination: PaginationInfo,
    /// Preserved context with fresh page info and request stamp.
    pub catalog_context: CatalogContext,
    /// Timing and volume measurements.
    pub metrics: LoadMoreMetrics,
    /// Correlation ID for this invocation.
    pub request_id: RequestId,
    /// Whether this was the final page (`!pagination.has_more`).
    pub is_last_page: bool,
}

/// Use case: append the next page of a specific catalog from a specific
/// provider.
///
/// Unlike the aggregator there is no fallback target here, so provider
/// resolution, initialization, and fetch failures are all surfaced as a
/// single wrapped error. On failure no partial state is produced; callers
/// only apply returned items on success.
///
/// Callers must apply pages in request order and must not issue two
/// concurrent load-more calls against the same catalog; the engine does not
/// serialize them.
pub struct CatalogPager {
    registry: Arc<ProviderRegistry>,
}

impl CatalogPager {
    /// Create a pager over `registry`.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Fetch one more page of one catalog.
    ///
    /// Steps: validate inputs (before any provider call), resolve the
    /// provider, ensure it is initialized, fetch the raw items and the
    /// catalog snapshot (two distinct provider calls - the snapshot is the
    /// authority on pagination, item-count heuristics are not trusted),
    /// derive the preserved context, and validate pagination consistency.
    ///
    /// Consistency anomalies (returned page != requested page, total counts
    /// regressing versus `original_pagination`) are logged as warnings and
    /// never fail the call: they indicate upstream provider inconsistency
    /// the UI should tolerate.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for malformed parameters, `ProviderNotFound` when the
    /// provider ID is not registered, `Provider` when initialization or
    /// either fetch fails or the provider lacks the catalog capability.
    pub async fn load_more(&self, request: LoadMoreRequest) -> Result<LoadMoreResult> {
        let request_id = RequestId::new();
        let started = Instant::now();

        // Step 1: fail fast on bad input, before any provider call.
        let limit = Self::validate(&request)?;

        debug!(
            request = %request_id,
            provider = %request.provider_id,
            catalog = %request.catalog_id,
            page = request.page,
            limit,
            "Loading more catalog items"
        );

        // Step 2: resolve the provider. Not found is a hard failure for
        // this single operation.
        let lookup_started = Instant::now();
        let entry = self
            .registry
            .provider(&request.provider_id)
            .ok_or_else(|| Error::provider_not_found(&request.provider_id))?;
        let handle = entry.catalog().ok_or_else(|| {
            Error::provider(
                &request.provider_id,
                "provider does not support the catalog capability",
            )
        })?;
        let provider_lookup_time = lookup_started.elapsed();

        // Step 3: idempotent initialization; failure aborts this request only.
        handle
            .initialize()
            .await
            .map_err(|e| Error::provider(&request.provider_id, e.to_string()))?;

        // Step 4: items and authoritative pagination are two distinct calls.
        let fetch_started = Instant::now();
        let items = handle
            .load_more_items(&request.catalog_id, request.page, limit)
            .await
            .map_err(|e| Error::provider(&request.provider_id, e.to_string()))?;
        let snapshot = handle
            .get_catalog(&request.catalog_id, request.page, limit)
            .await
            .map_err(|e| Error::provider(&request.provider_id, e.to_string()))?;
        let catalog_fetch_time = fetch_started.elapsed();

        // Step 5: preserved context. Chain off what the UI originally saw if
        // it told us; otherwise adopt the fresh context. Either way the page
        // info is overlaid from the authoritative snapshot.
        let pagination = snapshot.pagination;
        let page_info = PageInfo {
            current_page: pagination.page,
            total_pages: pagination.total_pages,
            total_items: pagination.total_items,
            has_more_pages: pagination.has_more,
            page_size: limit,
        };
        let base = request
            .original_context
            .as_ref()
            .unwrap_or(&snapshot.context);
        let catalog_context = base.with_page_info(page_info, request_id);

        // Step 6: consistency validation, warn-only.
        self.validate_consistency(&request, &pagination, request_id);

        let metrics = LoadMoreMetrics {
            execution_time: started.elapsed(),
            provider_lookup_time,
            catalog_fetch_time,
            items_loaded: items.len(),
            was_cached: false,
        };
        let is_last_page = !pagination.has_more;

        info!(
            request = %request_id,
            provider = %request.provider_id,
            catalog = %request.catalog_id,
            page = pagination.page,
            items = metrics.items_loaded,
            is_last_page,
            "Loaded catalog page"
        );

        Ok(LoadMoreResult {
            items,
            pagination,
            catalog_context,
            metrics,
            request_id,
            is_last_page,
        })
    }

    /// Validate the request, returning the effective page size.
    fn validate(request: &LoadMoreRequest) -> Result<u32> {
        if request.provider_id.trim().is_empty() {
            return Err(Error::invalid_input("provider_id must not be empty"));
        }
        if request.catalog_id.trim().is_empty() {
            return Err(Error::invalid_input("catalog_id must not be empty"));
        }
        if request.page < 1 {
            return Err(Error::invalid_input("page must be a positive integer"));
        }
        let limit = request.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(Error::invalid_input(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(limit)
    }

    /// Warn-only checks against what the provider returned.
    fn validate_consistency(
        &self,
        request: &LoadMoreRequest,
        pagination: &PaginationInfo,
        request_id: RequestId,
    ) {
        if pagination.page != request.page {
            warn!(
                request = %request_id,
                provider = %request.provider_id,
                catalog = %request.catalog_id,
                requested = request.page,
                returned = pagination.page,
                "Provider returned a different page than requested"
            );
        }
        let Some(original) = &request.original_pagination else {
            return;
        };
        if let (Some(new), Some(old)) = (pagination.total_items, original.total_items) {
            if new < old {
                warn!(
                    request = %request_id,
                    provider = %request.provider_id,
                    catalog = %request.catalog_id,
                    old_total_items = old,
                    new_total_items = new,
                    "Total item count regressed since the original fetch"
                );
            }
        }
        if let (Some(new), Some(old)) = (pagination.total_pages, original.total_pages) {
            if new < old {
                warn!(
                    request = %request_id,
                    provider = %request.provider_id,
                    catalog = %request.catalog_id,
                    old_total_pages = old,
                    new_total_pages = new,
                    "Total page count regressed since the original fetch"
                );
            }
        }
    }
}
