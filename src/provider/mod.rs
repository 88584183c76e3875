//! Capability contracts for content providers.
//!
//! This module defines the typed interfaces a provider backend (a TMDB-like
//! metadata service, a Trakt-like activity service, etc.) implements, one
//! trait per structurally distinct capability, plus [`ProviderRegistration`]
//! which bundles the handles a provider declares at registration time.
//!
//! Capabilities are a closed set ([`Capability`]): a provider supports
//! exactly what its registration declares. There is no runtime probing of
//! provider shapes.
//!
//! Providers are expected to be wrapped in an `Arc` so they can be shared
//! across tasks; one concrete provider struct may be registered under
//! several capability handles.

pub mod registry;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use marquee_common::{Capability, MediaType};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogItem, PaginationInfo};
use crate::context::CatalogContext;
use crate::enrichment::EnrichmentResult;

pub use registry::{ProviderEntry, ProviderRegistry, RegistryStats};

// ---------------------------------------------------------------------------
// Shared result types
// ---------------------------------------------------------------------------

/// One page of one catalog, as returned by [`CatalogProvider::get_catalog`].
#[derive(Debug, Clone)]
pub struct CatalogPage {
    /// Items on this page, in provider order.
    pub items: Vec<CatalogItem>,
    /// Authoritative pagination metadata for the catalog.
    pub pagination: PaginationInfo,
    /// Provenance of this page.
    pub context: CatalogContext,
}

/// A person returned by a [`PeopleProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Provider-scoped person identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short biography, if available.
    pub biography: Option<String>,
    /// URL or path fragment for the profile image.
    pub profile_path: Option<String>,
    /// Known-for department (e.g. "Acting").
    pub known_for: Option<String>,
}

/// A season of a series returned by a [`SeasonsProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    /// Season number (0 is conventionally specials).
    pub season_number: u32,
    /// Display name of the season.
    pub name: String,
    /// Number of episodes in the season, if known.
    pub episode_count: Option<u32>,
    /// URL or path fragment for the season poster.
    pub poster_path: Option<String>,
}

/// An episode of a season returned by a [`SeasonsProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Provider-scoped episode identifier.
    pub id: String,
    /// Season the episode belongs to.
    pub season_number: u32,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Display title.
    pub title: String,
    /// Short synopsis, if available.
    pub overview: Option<String>,
    /// Air date as an ISO-8601 string (YYYY-MM-DD), if known.
    pub air_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Base contract every provider handle implements.
///
/// All trait methods may reject; rejection messages must be human-readable,
/// as they are recorded verbatim in per-provider error entries.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short, stable identifier for this provider (e.g. `"tmdb"`).
    fn id(&self) -> &str;

    /// Display name for this provider (e.g. `"The Movie Database"`).
    fn name(&self) -> &str;

    /// Prepare the provider for use (credential checks, config fetches).
    ///
    /// Must be idempotent: the engine calls this before every single-provider
    /// operation and once per provider per aggregation batch.
    async fn initialize(&self) -> anyhow::Result<()>;
}

/// Catalog listing and pagination.
#[async_trait]
pub trait CatalogProvider: Provider {
    /// Return every catalog this provider offers, with its first page loaded.
    async fn get_all_catalogs(&self) -> anyhow::Result<Vec<Catalog>>;

    /// Fetch one page of one catalog, including authoritative pagination
    /// metadata and a fresh context.
    async fn get_catalog(&self, catalog_id: &str, page: u32, limit: u32)
        -> anyhow::Result<CatalogPage>;

    /// Fetch just the raw items of one page of one catalog.
    async fn load_more_items(
        &self,
        catalog_id: &str,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<Vec<CatalogItem>>;
}

/// Full-text search across the provider's content.
#[async_trait]
pub trait SearchProvider: Provider {
    /// Search for items matching `query`, optionally constrained to one
    /// media type. `page` is 1-based.
    async fn search(
        &self,
        query: &str,
        media_type: Option<MediaType>,
        page: u32,
    ) -> anyhow::Result<Vec<CatalogItem>>;
}

/// Person lookups and filmographies.
#[async_trait]
pub trait PeopleProvider: Provider {
    /// Fetch one person by provider-scoped ID.
    async fn get_person(&self, person_id: &str) -> anyhow::Result<Person>;

    /// Fetch the items a person is credited on.
    async fn get_filmography(&self, person_id: &str) -> anyhow::Result<Vec<CatalogItem>>;
}

/// Season and episode listings for series.
#[async_trait]
pub trait SeasonsProvider: Provider {
    /// List the seasons of a series.
    async fn get_seasons(&self, series_id: &str) -> anyhow::Result<Vec<Season>>;

    /// List the episodes of one season of a series.
    async fn get_episodes(
        &self,
        series_id: &str,
        season_number: u32,
    ) -> anyhow::Result<Vec<Episode>>;
}

/// Facet enrichment: metadata, images, ratings, external IDs, and the other
/// per-item capabilities that contribute one slice of data to an item.
///
/// The `capability` argument names the facet being requested; a provider
/// registered as an enricher for several capabilities receives the one the
/// coordinator is asking for.
#[async_trait]
pub trait Enricher: Provider {
    /// Fetch one facet of data for one item.
    async fn enrich(
        &self,
        media_type: MediaType,
        media_id: &str,
        capability: Capability,
    ) -> anyhow::Result<EnrichmentResult>;
}

// ---------------------------------------------------------------------------
// Registration record
// ---------------------------------------------------------------------------

/// What a provider declares when it is registered: identity, owning source,
/// and the typed capability handles it implements.
///
/// Built with the `with_*` methods; the derived capability set is exactly
/// the set of declared handles.
///
/// # Examples
///
/// ```rust,ignore
/// let registration = ProviderRegistration::new("tmdb", "The Movie Database", "tmdb-source")
///     .with_catalog(provider.clone())
///     .with_search(provider.clone())
///     .with_enricher(Capability::Metadata, provider.clone())
///     .with_enricher(Capability::Images, provider);
/// registry.register(registration);
/// ```
#[derive(Clone)]
pub struct ProviderRegistration {
    /// Short, stable identifier for the provider.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Identifier of the source that registered this provider. Sources are
    /// unregistered in bulk, taking all of their providers with them.
    pub source_id: String,
    pub(crate) catalog: Option<Arc<dyn CatalogProvider>>,
    pub(crate) search: Option<Arc<dyn SearchProvider>>,
    pub(crate) people: Option<Arc<dyn PeopleProvider>>,
    pub(crate) seasons: Option<Arc<dyn SeasonsProvider>>,
    pub(crate) enrichers: BTreeMap<Capability, Arc<dyn Enricher>>,
}

impl ProviderRegistration {
    /// Start a registration with no capabilities declared.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_id: source_id.into(),
            catalog: None,
            search: None,
            people: None,
            seasons: None,
            enrichers: BTreeMap::new(),
        }
    }

    /// Declare the [`Capability::Catalog`] capability.
    #[must_use]
    pub fn with_catalog(mut self, handle: Arc<dyn CatalogProvider>) -> Self {
        self.catalog = Some(handle);
        self
    }

    /// Declare the [`Capability::Search`] capability.
    #[must_use]
    pub fn with_search(mut self, handle: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(handle);
        self
    }

    /// Declare the [`Capability::People`] capability.
    #[must_use]
    pub fn with_people(mut self, handle: Arc<dyn PeopleProvider>) -> Self {
        self.people = Some(handle);
        self
    }

    /// Declare the [`Capability::SeasonsEpisodes`] capability.
    #[must_use]
    pub fn with_seasons(mut self, handle: Arc<dyn SeasonsProvider>) -> Self {
        self.seasons = Some(handle);
        self
    }

    /// Declare an enrichment capability (metadata, images, ratings, ...).
    ///
    /// Registering the same capability twice keeps the last handle.
    #[must_use]
    pub fn with_enricher(mut self, capability: Capability, handle: Arc<dyn Enricher>) -> Self {
        self.enrichers.insert(capability, handle);
        self
    }

    /// The set of capabilities this registration declares.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        let mut caps = BTreeSet::new();
        if self.catalog.is_some() {
            caps.insert(Capability::Catalog);
        }
        if self.search.is_some() {
            caps.insert(Capability::Search);
        }
        if self.people.is_some() {
            caps.insert(Capability::People);
        }
        if self.seasons.is_some() {
            caps.insert(Capability::SeasonsEpisodes);
        }
        caps.extend(self.enrichers.keys().copied());
        caps
    }
}

impl std::fmt::Debug for ProviderRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistration")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source_id", &self.source_id)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
