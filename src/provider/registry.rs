//! Provider registry: the authoritative map of which providers exist and
//! what they can do.
//!
//! The [`ProviderRegistry`] indexes registered providers by ID, by
//! capability, and by owning source. It is the only shared mutable structure
//! in the engine; a `parking_lot::RwLock` around the entry list gives
//! concurrent readers snapshot semantics, so a capability lookup racing a
//! bulk source unregistration sees either the full set or the post-removal
//! set, never a half-removed one.
//!
//! Registration order is meaningful: capability lookups return providers in
//! the order they were registered, and callers treat that order as the
//! fallback priority. Re-registering an existing provider ID overwrites the
//! entry in place (upsert), keeping its original slot so an upsert does not
//! silently reshuffle priorities.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use marquee_common::Capability;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use super::{
    CatalogProvider, Enricher, PeopleProvider, ProviderRegistration, SearchProvider,
    SeasonsProvider,
};

/// An immutable registered-provider record handed out by lookups.
///
/// Entries are shared via `Arc`; once registered they are never mutated, so
/// a snapshot taken by a reader stays valid even if the provider is
/// unregistered mid-flight.
pub struct ProviderEntry {
    /// Short, stable identifier for the provider.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Identifier of the source that registered the provider.
    pub source_id: String,
    catalog: Option<Arc<dyn CatalogProvider>>,
    search: Option<Arc<dyn SearchProvider>>,
    people: Option<Arc<dyn PeopleProvider>>,
    seasons: Option<Arc<dyn SeasonsProvider>>,
    enrichers: BTreeMap<Capability, Arc<dyn Enricher>>,
}

impl ProviderEntry {
    /// The catalog handle, if this provider declared the capability.
    pub fn catalog(&self) -> Option<Arc<dyn CatalogProvider>> {
        self.catalog.clone()
    }

    /// The search handle, if declared.
    pub fn search(&self) -> Option<Arc<dyn SearchProvider>> {
        self.search.clone()
    }

    /// The people handle, if declared.
    pub fn people(&self) -> Option<Arc<dyn PeopleProvider>> {
        self.people.clone()
    }

    /// The seasons/episodes handle, if declared.
    pub fn seasons(&self) -> Option<Arc<dyn SeasonsProvider>> {
        self.seasons.clone()
    }

    /// The enricher handle for `capability`, if declared.
    pub fn enricher(&self, capability: Capability) -> Option<Arc<dyn Enricher>> {
        self.enrichers.get(&capability).cloned()
    }

    /// The set of capabilities this provider declared at registration.
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

    /// Whether this provider declared `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Catalog => self.catalog.is_some(),
            Capability::Search => self.search.is_some(),
            Capability::People => self.people.is_some(),
            Capability::SeasonsEpisodes => self.seasons.is_some(),
            other => self.enrichers.contains_key(&other),
        }
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source_id", &self.source_id)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

impl From<ProviderRegistration> for ProviderEntry {
    fn from(reg: ProviderRegistration) -> Self {
        Self {
            id: reg.id,
            name: reg.name,
            source_id: reg.source_id,
            catalog: reg.catalog,
            search: reg.search,
            people: reg.people,
            seasons: reg.seasons,
            enrichers: reg.enrichers,
        }
    }
}

/// Registry observability counters, serializable for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    /// Number of registered providers.
    pub total_providers: usize,
    /// Number of distinct sources with at least one provider.
    pub total_sources: usize,
    /// Provider count per capability.
    pub providers_by_capability: BTreeMap<String, usize>,
    /// Provider count per source.
    pub providers_by_source: BTreeMap<String, usize>,
}

/// In-memory index of registered providers.
///
/// Constructed once per app session and passed by handle (`Arc`) to the use
/// cases; tests construct a fresh registry each. Never a global singleton.
#[derive(Default)]
pub struct ProviderRegistry {
    // Registration order is preserved; all lookups iterate this list.
    entries: RwLock<Vec<Arc<ProviderEntry>>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, or overwrite an existing one with the same ID.
    ///
    /// Upsert semantics: a duplicate ID replaces the old entry in place,
    /// keeping its registration slot; the old entry's handles are dropped
    /// wholesale. Registration makes the provider immediately visible to all
    /// capability and source queries.
    pub fn register(&self, registration: ProviderRegistration) {
        let capabilities = registration.capabilities();
        let entry = Arc::new(ProviderEntry::from(registration));
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                debug!(provider = %entry.id, "Overwriting existing provider registration");
                *slot = entry;
            }
            None => {
                info!(
                    provider = %entry.id,
                    source = %entry.source_id,
                    capabilities = ?capabilities,
                    "Registered provider"
                );
                entries.push(entry);
            }
        }
    }

    /// Look up a provider by ID.
    pub fn provider(&self, id: &str) -> Option<Arc<ProviderEntry>> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    /// All providers declaring `capability`, in registration order.
    ///
    /// Registration order acts as the fallback priority: callers that fall
    /// back across providers try the first entry first. An empty result
    /// means no provider covers the capability; that is not an error.
    pub fn providers_for_capability(&self, capability: Capability) -> Vec<Arc<ProviderEntry>> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.has_capability(capability))
            .cloned()
            .collect()
    }

    /// Catalog handles of every catalog-capable provider, in registration
    /// order, paired with their entries.
    pub fn catalog_providers(&self) -> Vec<(Arc<ProviderEntry>, Arc<dyn CatalogProvider>)> {
        self.entries
            .read()
            .iter()
            .filter_map(|e| e.catalog().map(|h| (e.clone(), h)))
            .collect()
    }

    /// Search handles of every search-capable provider, in registration order.
    pub fn search_providers(&self) -> Vec<Arc<dyn SearchProvider>> {
        self.entries
            .read()
            .iter()
            .filter_map(|e| e.search())
            .collect()
    }

    /// People handles of every people-capable provider, in registration order.
    pub fn people_providers(&self) -> Vec<Arc<dyn PeopleProvider>> {
        self.entries
            .read()
            .iter()
            .filter_map(|e| e.people())
            .collect()
    }

    /// Seasons/episodes handles, in registration order.
    pub fn seasons_providers(&self) -> Vec<Arc<dyn SeasonsProvider>> {
        self.entries
            .read()
            .iter()
            .filter_map(|e| e.seasons())
            .collect()
    }

    /// Enricher handles for `capability`, in registration order.
    pub fn enrichers_for(&self, capability: Capability) -> Vec<Arc<dyn Enricher>> {
        self.entries
            .read()
            .iter()
            .filter_map(|e| e.enricher(capability))
            .collect()
    }

    /// All providers registered by `source_id`, in registration order.
    pub fn providers_by_source(&self, source_id: &str) -> Vec<Arc<ProviderEntry>> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.source_id == source_id)
            .cloned()
            .collect()
    }

    /// Union of the capabilities of every provider from `source_id`.
    pub fn capabilities_by_source(&self, source_id: &str) -> BTreeSet<Capability> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.source_id == source_id)
            .flat_map(|e| e.capabilities())
            .collect()
    }

    /// Distinct source IDs with at least one registered provider, ordered by
    /// first registration.
    pub fn all_sources(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut sources = Vec::new();
        for entry in entries.iter() {
            if !sources.contains(&entry.source_id) {
                sources.push(entry.source_id.clone());
            }
        }
        sources
    }

    /// Remove every provider registered by `source_id`.
    ///
    /// The removal happens under the write lock, so concurrent lookups see
    /// either all of the source's providers or none of them. Unknown sources
    /// remove nothing; that is not an error.
    pub fn unregister_source(&self, source_id: &str) {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.source_id != source_id);
        let removed = before - entries.len();
        if removed > 0 {
            info!(source = %source_id, removed, "Unregistered providers by source");
        }
    }

    /// Observability counters by provider, capability, and source.
    pub fn stats(&self) -> RegistryStats {
        let entries = self.entries.read();
        let mut providers_by_capability: BTreeMap<String, usize> = BTreeMap::new();
        let mut providers_by_source: BTreeMap<String, usize> = BTreeMap::new();
        for entry in entries.iter() {
            for cap in entry.capabilities() {
                *providers_by_capability.entry(cap.to_string()).or_default() += 1;
            }
            *providers_by_source.entry(entry.source_id.clone()).or_default() += 1;
        }
        RegistryStats {
            total_providers: entries.len(),
            total_sources: providers_by_source.len(),
            providers_by_capability,
            providers_by_source,
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read();
        f.debug_struct("ProviderRegistry")
            .field("providers", &entries.len())
            .finish()
    }
}
