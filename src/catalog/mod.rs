//! Catalog and catalog-item data model.
//!
//! A [`Catalog`] is a named, paginated collection of [`CatalogItem`]s from a
//! single provider. Catalogs are created by the aggregation engine on first
//! fetch and grow append-only: "load more" appends items and replaces the
//! pagination snapshot, but items already present are never removed or
//! reordered.

use chrono::{DateTime, Utc};
use marquee_common::MediaType;
use serde::{Deserialize, Serialize};

use crate::context::{CatalogContext, ContentContext};

/// Pagination state of a catalog as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Most recently applied page number, 1-based.
    pub page: u32,
    /// Total number of pages, if the provider reports it.
    pub total_pages: Option<u32>,
    /// Total number of items across all pages, if the provider reports it.
    pub total_items: Option<u64>,
    /// Whether more pages can be loaded.
    pub has_more: bool,
}

/// A single browsable item inside a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Provider-scoped identifier of the item.
    pub id: String,
    /// Whether this is a movie, series, or person.
    pub media_type: MediaType,
    /// Display title.
    pub title: String,
    /// Short synopsis / overview text.
    pub overview: Option<String>,
    /// URL or path fragment for the poster image.
    pub poster_path: Option<String>,
    /// URL or path fragment for the backdrop image.
    pub backdrop_path: Option<String>,
    /// Release or premiere year, if known.
    pub year: Option<u16>,
    /// Community rating (typically 0.0 - 10.0).
    pub rating: Option<f64>,
    /// Provenance snapshot for this item.
    pub context: ContentContext,
}

/// A named, paginated collection of items from one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Provider-scoped catalog identifier (e.g. "popular").
    pub id: String,
    /// Display name (e.g. "Popular Movies").
    pub name: String,
    /// Provider-specific catalog type string (e.g. "trending_movies").
    pub catalog_type: String,
    /// Predominant media type of the catalog's items.
    pub media_type: MediaType,
    /// Items loaded so far, in provider-returned order.
    pub items: Vec<CatalogItem>,
    /// Pagination state after the most recent fetch.
    pub pagination: PaginationInfo,
    /// Provenance of the catalog's most recently fetched page.
    pub context: CatalogContext,
    /// When the catalog was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Catalog {
    /// Append a freshly loaded page to the catalog.
    ///
    /// Items are appended in the order the provider returned them; existing
    /// items are left untouched. The pagination snapshot is replaced and
    /// `updated_at` stamped. Callers must apply pages in request order and
    /// must not issue concurrent load-more calls for the same catalog.
    pub fn append_page(&mut self, items: Vec<CatalogItem>, pagination: PaginationInfo) {
        self.items.extend(items);
        self.pagination = pagination;
        self.updated_at = Utc::now();
    }
}
