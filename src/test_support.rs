//! Scripted stub providers shared by the crate's unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use marquee_common::{Capability, MediaType, RequestId};
use parking_lot::Mutex;

use crate::catalog::{Catalog, CatalogItem, PaginationInfo};
use crate::context::{CatalogContext, ContentContext, PageInfo};
use crate::enrichment::EnrichmentResult;
use crate::provider::{CatalogPage, CatalogProvider, Enricher, Provider, SearchProvider};

/// One scripted catalog a [`StubProvider`] serves.
struct StubCatalog {
    id: String,
    items_per_page: usize,
    total_pages: Option<u32>,
    total_items: Option<u64>,
}

/// A configurable in-memory provider that records how it was called.
pub struct StubProvider {
    pub provider_id: String,
    pub provider_name: String,
    catalogs: Vec<StubCatalog>,
    fail_init: Option<String>,
    fail_catalogs: Option<String>,
    fail_enrich: Option<String>,
    enrich_payloads: BTreeMap<Capability, serde_json::Value>,
    init_calls: AtomicUsize,
    all_catalogs_calls: AtomicUsize,
    get_catalog_calls: AtomicUsize,
    load_more_calls: AtomicUsize,
    enrich_calls: AtomicUsize,
    last_limit: Mutex<Option<u32>>,
}

impl StubProvider {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            provider_id: id.to_string(),
            provider_name: name.to_string(),
            catalogs: Vec::new(),
            fail_init: None,
            fail_catalogs: None,
            fail_enrich: None,
            enrich_payloads: BTreeMap::new(),
            init_calls: AtomicUsize::new(0),
            all_catalogs_calls: AtomicUsize::new(0),
            get_catalog_calls: AtomicUsize::new(0),
            load_more_calls: AtomicUsize::new(0),
            enrich_calls: AtomicUsize::new(0),
            last_limit: Mutex::new(None),
        }
    }

    /// Script a catalog serving `items_per_page` items on every page.
    pub fn with_catalog(mut self, id: &str, items_per_page: usize, total_pages: Option<u32>) -> Self {
        self.catalogs.push(StubCatalog {
            id: id.to_string(),
            items_per_page,
            total_pages,
            total_items: None,
        });
        self
    }

    /// Set the reported total item count of the most recently added catalog.
    pub fn with_total_items(mut self, total_items: u64) -> Self {
        if let Some(last) = self.catalogs.last_mut() {
            last.total_items = Some(total_items);
        }
        self
    }

    /// Script an enrichment payload for one capability.
    pub fn with_enrichment(mut self, capability: Capability, data: serde_json::Value) -> Self {
        self.enrich_payloads.insert(capability, data);
        self
    }

    pub fn failing_init(mut self, message: &str) -> Self {
        self.fail_init = Some(message.to_string());
        self
    }

    pub fn failing_catalogs(mut self, message: &str) -> Self {
        self.fail_catalogs = Some(message.to_string());
        self
    }

    pub fn failing_enrich(mut self, message: &str) -> Self {
        self.fail_enrich = Some(message.to_string());
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn get_all_catalogs_calls(&self) -> usize {
        self.all_catalogs_calls.load(Ordering::SeqCst)
    }

    pub fn get_catalog_calls(&self) -> usize {
        self.get_catalog_calls.load(Ordering::SeqCst)
    }

    pub fn load_more_calls(&self) -> usize {
        self.load_more_calls.load(Ordering::SeqCst)
    }

    pub fn enrich_calls(&self) -> usize {
        self.enrich_calls.load(Ordering::SeqCst)
    }

    /// Every provider call made against this stub, across all methods.
    pub fn total_calls(&self) -> usize {
        self.init_calls()
            + self.get_all_catalogs_calls()
            + self.get_catalog_calls()
            + self.load_more_calls()
            + self.enrich_calls()
    }

    pub fn last_limit(&self) -> Option<u32> {
        *self.last_limit.lock()
    }

    fn context_for(&self, catalog: &StubCatalog, page: u32, page_size: u32) -> CatalogContext {
        CatalogContext {
            provider_id: self.provider_id.clone(),
            provider_name: self.provider_name.clone(),
            catalog_id: catalog.id.clone(),
            catalog_name: catalog.id.clone(),
            catalog_type: format!("{}_catalog", catalog.id),
            page_info: PageInfo {
                current_page: page,
                total_pages: catalog.total_pages,
                total_items: catalog.total_items,
                has_more_pages: catalog.total_pages.map_or(true, |tp| page < tp),
                page_size,
            },
            filters: BTreeMap::new(),
            last_fetch_at: Utc::now(),
            request_id: RequestId::new(),
            metadata: serde_json::Value::Null,
        }
    }

    fn items_for(&self, catalog: &StubCatalog, page: u32, page_size: u32) -> Vec<CatalogItem> {
        let context = self.context_for(catalog, page, page_size);
        (0..catalog.items_per_page)
            .map(|i| {
                let id = format!("{}-p{}-{}", catalog.id, page, i);
                CatalogItem {
                    id: id.clone(),
                    media_type: MediaType::Movie,
                    title: format!("Item {i} of {} page {page}", catalog.id),
                    overview: None,
                    poster_path: None,
                    backdrop_path: None,
                    year: Some(2024),
                    rating: None,
                    context: ContentContext::new(&context, MediaType::Movie, id, i),
                }
            })
            .collect()
    }

    fn pagination_for(&self, catalog: &StubCatalog, page: u32) -> PaginationInfo {
        PaginationInfo {
            page,
            total_pages: catalog.total_pages,
            total_items: catalog.total_items,
            has_more: catalog.total_pages.map_or(true, |tp| page < tp),
        }
    }

    fn find_catalog(&self, catalog_id: &str) -> anyhow::Result<&StubCatalog> {
        self.catalogs
            .iter()
            .find(|c| c.id == catalog_id)
            .ok_or_else(|| anyhow::anyhow!("unknown catalog: {catalog_id}"))
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn id(&self) -> &str {
        &self.provider_id
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_init {
            Some(msg) => anyhow::bail!("{msg}"),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogProvider for StubProvider {
    async fn get_all_catalogs(&self) -> anyhow::Result<Vec<Catalog>> {
        self.all_catalogs_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fail_catalogs {
            anyhow::bail!("{msg}");
        }
        Ok(self
            .catalogs
            .iter()
            .map(|catalog| Catalog {
                id: catalog.id.clone(),
                name: catalog.id.clone(),
                catalog_type: format!("{}_catalog", catalog.id),
                media_type: MediaType::Movie,
                items: self.items_for(catalog, 1, 20),
                pagination: self.pagination_for(catalog, 1),
                context: self.context_for(catalog, 1, 20),
                updated_at: Utc::now(),
            })
            .collect())
    }

    async fn get_catalog(
        &self,
        catalog_id: &str,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<CatalogPage> {
        self.get_catalog_calls.fetch_add(1, Ordering::SeqCst);
        let catalog = self.find_catalog(catalog_id)?;
        Ok(CatalogPage {
            items: self.items_for(catalog, page, limit),
            pagination: self.pagination_for(catalog, page),
            context: self.context_for(catalog, page, limit),
        })
    }

    async fn load_more_items(
        &self,
        catalog_id: &str,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<Vec<CatalogItem>> {
        self.load_more_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_limit.lock() = Some(limit);
        let catalog = self.find_catalog(catalog_id)?;
        Ok(self.items_for(catalog, page, limit))
    }
}

#[async_trait]
impl SearchProvider for StubProvider {
    async fn search(
        &self,
        _query: &str,
        _media_type: Option<MediaType>,
        _page: u32,
    ) -> anyhow::Result<Vec<CatalogItem>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl Enricher for StubProvider {
    async fn enrich(
        &self,
        _media_type: MediaType,
        media_id: &str,
        capability: Capability,
    ) -> anyhow::Result<EnrichmentResult> {
        self.enrich_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fail_enrich {
            anyhow::bail!("{msg}");
        }
        let data = self
            .enrich_payloads
            .get(&capability)
            .cloned()
            .unwrap_or_else(|| {
                serde_json::json!({ "provider": self.provider_id, "media_id": media_id })
            });
        Ok(EnrichmentResult {
            capability,
            provider_id: self.provider_id.clone(),
            provider_name: self.provider_name.clone(),
            data,
            fetched_at: Utc::now(),
        })
    }
}
