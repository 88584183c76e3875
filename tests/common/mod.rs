//! Shared test harness for integration tests.
//!
//! Provides [`ScriptedProvider`], a configurable in-memory provider that
//! records how it was called, plus helpers to assemble a registry the way a
//! host app would at startup.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use chrono::Utc;
use marquee::catalog::{Catalog, CatalogItem, PaginationInfo};
use marquee::context::{CatalogContext, ContentContext, PageInfo};
use marquee::enrichment::EnrichmentResult;
use marquee::provider::{
    CatalogPage, CatalogProvider, Enricher, Provider, ProviderRegistration, ProviderRegistry,
};
use marquee_common::{Capability, MediaType, RequestId};

static TRACING: Once = Once::new();

/// Install the tracing subscriber once per test binary.
///
/// Set `RUST_LOG=marquee=debug` to see engine logs while debugging a test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Script for one catalog a [`ScriptedProvider`] serves.
#[derive(Clone)]
pub struct CatalogScript {
    pub id: String,
    pub items_per_page: usize,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
}

/// A provider whose behavior is fully scripted up front.
pub struct ScriptedProvider {
    pub provider_id: String,
    pub provider_name: String,
    catalogs: Vec<CatalogScript>,
    fail_init: Option<String>,
    fail_catalogs: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            provider_id: id.into(),
            provider_name: name.into(),
            catalogs: Vec::new(),
            fail_init: None,
            fail_catalogs: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn serving(mut self, script: CatalogScript) -> Self {
        self.catalogs.push(script);
        self
    }

    pub fn broken_init(mut self, message: &str) -> Self {
        self.fail_init = Some(message.into());
        self
    }

    pub fn broken_catalogs(mut self, message: &str) -> Self {
        self.fail_catalogs = Some(message.into());
        self
    }

    /// Total provider calls of any kind made against this stub.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn context_for(&self, script: &CatalogScript, page: u32, page_size: u32) -> CatalogContext {
        CatalogContext {
            provider_id: self.provider_id.clone(),
            provider_name: self.provider_name.clone(),
            catalog_id: script.id.clone(),
            catalog_name: script.id.clone(),
            catalog_type: format!("{}_row", script.id),
            page_info: PageInfo {
                current_page: page,
                total_pages: script.total_pages,
                total_items: script.total_items,
                has_more_pages: script.total_pages.map_or(true, |tp| page < tp),
                page_size,
            },
            filters: BTreeMap::new(),
            last_fetch_at: Utc::now(),
            request_id: RequestId::new(),
            metadata: serde_json::Value::Null,
        }
    }

    fn page_for(&self, script: &CatalogScript, page: u32, page_size: u32) -> CatalogPage {
        let context = self.context_for(script, page, page_size);
        let items = (0..script.items_per_page)
            .map(|i| {
                let id = format!("{}-p{}-{}", script.id, page, i);
                CatalogItem {
                    id: id.clone(),
                    media_type: MediaType::Movie,
                    title: format!("{} item {i}", script.id),
                    overview: None,
                    poster_path: None,
                    backdrop_path: None,
                    year: Some(2024),
                    rating: Some(7.1),
                    context: ContentContext::new(&context, MediaType::Movie, id, i),
                }
            })
            .collect();
        CatalogPage {
            items,
            pagination: PaginationInfo {
                page,
                total_pages: script.total_pages,
                total_items: script.total_items,
                has_more: script.total_pages.map_or(true, |tp| page < tp),
            },
            context,
        }
    }

    fn script(&self, catalog_id: &str) -> anyhow::Result<&CatalogScript> {
        self.catalogs
            .iter()
            .find(|c| c.id == catalog_id)
            .ok_or_else(|| anyhow::anyhow!("unknown catalog: {catalog_id}"))
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.provider_id
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_init {
            Some(msg) => anyhow::bail!("{msg}"),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogProvider for ScriptedProvider {
    async fn get_all_catalogs(&self) -> anyhow::Result<Vec<Catalog>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fail_catalogs {
            anyhow::bail!("{msg}");
        }
        Ok(self
            .catalogs
            .iter()
            .map(|script| {
                let page = self.page_for(script, 1, 20);
                Catalog {
                    id: script.id.clone(),
                    name: script.id.clone(),
                    catalog_type: format!("{}_row", script.id),
                    media_type: MediaType::Movie,
                    items: page.items,
                    pagination: page.pagination,
                    context: page.context,
                    updated_at: Utc::now(),
                }
            })
            .collect())
    }

    async fn get_catalog(
        &self,
        catalog_id: &str,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<CatalogPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.page_for(self.script(catalog_id)?, page, limit))
    }

    async fn load_more_items(
        &self,
        catalog_id: &str,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<Vec<CatalogItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.page_for(self.script(catalog_id)?, page, limit).items)
    }
}

#[async_trait]
impl Enricher for ScriptedProvider {
    async fn enrich(
        &self,
        _media_type: MediaType,
        media_id: &str,
        capability: Capability,
    ) -> anyhow::Result<EnrichmentResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EnrichmentResult {
            capability,
            provider_id: self.provider_id.clone(),
            provider_name: self.provider_name.clone(),
            data: serde_json::json!({ "provider": self.provider_id, "media_id": media_id }),
            fetched_at: Utc::now(),
        })
    }
}

/// Register `provider` as a catalog provider under its own source.
pub fn register_catalog_provider(registry: &ProviderRegistry, provider: Arc<ScriptedProvider>) {
    init_tracing();
    registry.register(
        ProviderRegistration::new(
            provider.provider_id.clone(),
            provider.provider_name.clone(),
            format!("{}-source", provider.provider_id),
        )
        .with_catalog(provider),
    );
}
