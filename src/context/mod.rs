//! Provenance context for catalogs and the items inside them.
//!
//! Every catalog page carries a [`CatalogContext`] recording which provider
//! produced it, which catalog it belongs to, and where in the pagination
//! sequence it sits. Every item carries a [`ContentContext`] with its own
//! snapshot of the catalog context, so an item's provenance is frozen at
//! ingestion time and cannot be changed retroactively by later page
//! transitions.
//!
//! All three types are immutable value objects: "mutation" is always the
//! construction of a new value (see [`CatalogContext::next_page`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use marquee_common::{MediaType, RequestId};
use serde::{Deserialize, Serialize};

/// Pagination position of one catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Current page number, 1-based. Always >= 1.
    pub current_page: u32,
    /// Total number of pages, if the provider reports it.
    pub total_pages: Option<u32>,
    /// Total number of items across all pages, if the provider reports it.
    pub total_items: Option<u64>,
    /// Whether more pages exist after `current_page`.
    ///
    /// Recomputed on every page transition; never copied stale.
    pub has_more_pages: bool,
    /// Number of items requested per page.
    pub page_size: u32,
}

impl PageInfo {
    /// Build page info for the first page of a catalog.
    pub fn first_page(page_size: u32, total_pages: Option<u32>, total_items: Option<u64>) -> Self {
        Self {
            current_page: 1,
            total_pages,
            total_items,
            has_more_pages: total_pages.map_or(true, |tp| tp > 1),
            page_size,
        }
    }
}

/// Provenance of one page of one catalog from one provider.
///
/// Immutable. Advancing to the next page produces a fresh value via
/// [`next_page`](Self::next_page); the original remains valid and unchanged,
/// which is what allows already-ingested items to keep their own snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogContext {
    /// Identifier of the provider that produced this page (e.g. "tmdb").
    pub provider_id: String,
    /// Display name of the provider (e.g. "The Movie Database").
    pub provider_name: String,
    /// Provider-scoped catalog identifier (e.g. "popular").
    pub catalog_id: String,
    /// Display name of the catalog (e.g. "Popular Movies").
    pub catalog_name: String,
    /// Provider-specific catalog type string (e.g. "trending_movies").
    pub catalog_type: String,
    /// Pagination position of this page.
    pub page_info: PageInfo,
    /// Opaque filter key/value pairs the catalog was fetched with.
    pub filters: BTreeMap<String, String>,
    /// When this page was fetched.
    pub last_fetch_at: DateTime<Utc>,
    /// Correlation ID for the fetch that produced this page.
    pub request_id: RequestId,
    /// Opaque provider-specific metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl CatalogContext {
    /// Derive the context for the page after this one.
    ///
    /// Increments `current_page`, recomputes `has_more_pages` (`true` when
    /// `total_pages` is unknown, otherwise `true` iff another page exists
    /// after the new one), and stamps a fresh `request_id` and
    /// `last_fetch_at`. The receiver is not modified.
    #[must_use]
    pub fn next_page(&self) -> Self {
        let next = self.page_info.current_page + 1;
        let has_more = self.page_info.total_pages.map_or(true, |tp| next < tp);
        Self {
            page_info: PageInfo {
                current_page: next,
                has_more_pages: has_more,
                ..self.page_info.clone()
            },
            last_fetch_at: Utc::now(),
            request_id: RequestId::new(),
            ..self.clone()
        }
    }

    /// Rebuild this context with fresh page info and a new request stamp.
    ///
    /// Used by the pagination engine to overlay authoritative page info from
    /// a new fetch onto a context the UI has been chaining "load more" calls
    /// off of, without losing the original catalog identity or filters.
    #[must_use]
    pub fn with_page_info(&self, page_info: PageInfo, request_id: RequestId) -> Self {
        Self {
            page_info,
            last_fetch_at: Utc::now(),
            request_id,
            ..self.clone()
        }
    }
}

/// Provenance of a single item within a catalog page.
///
/// Holds its catalog context by value: each item owns its own snapshot, so
/// later catalog page transitions cannot retroactively change the provenance
/// of an item that was already rendered. Created once at ingestion and never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentContext {
    /// Snapshot of the catalog page this item was fetched from.
    pub catalog_context: CatalogContext,
    /// Media type the provider reported for the item.
    pub original_media_type: MediaType,
    /// Provider-scoped identifier of the item.
    pub original_media_id: String,
    /// Identifier of the originating provider.
    pub provider_id: String,
    /// Display name of the originating provider.
    pub provider_name: String,
    /// 0-based index of the item within the catalog at fetch time.
    pub position_in_catalog: usize,
    /// When the item was fetched.
    pub fetched_at: DateTime<Utc>,
    /// Correlation ID of the fetch that produced the item.
    pub request_id: RequestId,
    /// Raw provider payload kept for debugging, if enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_data: Option<serde_json::Value>,
}

impl ContentContext {
    /// Create the provenance record for one item at ingestion time.
    ///
    /// The catalog context is cloned into the record, decoupling the item
    /// from any later mutation of the source context.
    pub fn new(
        catalog_context: &CatalogContext,
        original_media_type: MediaType,
        original_media_id: impl Into<String>,
        position_in_catalog: usize,
    ) -> Self {
        Self {
            catalog_context: catalog_context.clone(),
            original_media_type,
            original_media_id: original_media_id.into(),
            provider_id: catalog_context.provider_id.clone(),
            provider_name: catalog_context.provider_name.clone(),
            position_in_catalog,
            fetched_at: Utc::now(),
            request_id: catalog_context.request_id,
            original_data: None,
        }
    }

    /// Attach the raw provider payload for debugging.
    #[must_use]
    pub fn with_original_data(mut self, data: serde_json::Value) -> Self {
        self.original_data = Some(data);
        self
    }
}
