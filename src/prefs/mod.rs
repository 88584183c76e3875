//! Per-user preference persistence.
//!
//! Preferences for every user live in a single JSON blob under one fixed
//! storage key, written through a pluggable [`KeyValueStore`] (the host app
//! supplies the on-device implementation; [`MemoryStore`] backs tests and
//! embedding). The blob maps user ID to a record of preferences plus
//! versioned metadata.
//!
//! The schema carries a version number per record. Loading branches on it:
//! the current version passes through, anything else is refused rather than
//! guessed at. Migration logic gets written when a second version exists.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use marquee_common::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed storage key the whole preferences blob lives under.
pub const STORAGE_KEY: &str = "marquee.user_preferences";

/// Current preferences schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Get/set/remove of string blobs, implemented by the host platform's
/// on-device storage. Failures are real errors; callers decide how to
/// surface them.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is fine.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory [`KeyValueStore`] for tests and non-persistent embedding.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// What a user has chosen about how the app behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// UI language tag (BCP 47, e.g. "en-US").
    #[serde(default = "default_language")]
    pub language: String,
    /// Region used for provider content filtering (ISO 3166-1, e.g. "US").
    #[serde(default)]
    pub region: Option<String>,
    /// Whether adult-rated content may appear in catalogs.
    #[serde(default)]
    pub include_adult: bool,
    /// Provider IDs the user has hidden from aggregation.
    #[serde(default)]
    pub hidden_providers: Vec<String>,
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: default_language(),
            region: None,
            include_adult: false,
            hidden_providers: Vec::new(),
        }
    }
}

/// Bookkeeping stored alongside each user's preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesMetadata {
    /// The user the record belongs to (duplicated from the blob key for
    /// integrity checks).
    pub user_id: String,
    /// When the record was first written.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
    /// Schema version the record was written with.
    pub schema_version: u32,
}

/// One user's entry in the blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    preferences: UserPreferences,
    metadata: PreferencesMetadata,
}

type PreferencesBlob = BTreeMap<String, UserRecord>;

/// Loads and saves [`UserPreferences`] through a [`KeyValueStore`].
///
/// The whole blob is read, modified, and written back on every save; the
/// expected cardinality is a handful of profiles on one device.
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    /// Create a store over the given key-value backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load one user's preferences. `Ok(None)` when the user has none yet.
    ///
    /// # Errors
    ///
    /// Fails when the backend fails, the blob does not parse, or the user's
    /// record carries a schema version this build does not know.
    pub fn load(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let blob = self.load_blob()?;
        match blob.get(user_id) {
            Some(record) => {
                Self::check_version(&record.metadata)?;
                Ok(Some(record.preferences.clone()))
            }
            None => Ok(None),
        }
    }

    /// Save one user's preferences, creating or updating their record.
    ///
    /// `created_at` is preserved across updates; `updated_at` and the schema
    /// version are stamped on every write.
    pub fn save(&self, user_id: &str, preferences: &UserPreferences) -> Result<()> {
        let mut blob = self.load_blob()?;
        let now = Utc::now();
        let created_at = blob
            .get(user_id)
            .map(|r| r.metadata.created_at)
            .unwrap_or(now);
        blob.insert(
            user_id.to_string(),
            UserRecord {
                preferences: preferences.clone(),
                metadata: PreferencesMetadata {
                    user_id: user_id.to_string(),
                    created_at,
                    updated_at: now,
                    schema_version: SCHEMA_VERSION,
                },
            },
        );
        let json = serde_json::to_string(&blob)?;
        self.store.set(STORAGE_KEY, &json)?;
        debug!(user = %user_id, "Saved user preferences");
        Ok(())
    }

    /// Remove one user's record. Removing an absent user is fine.
    pub fn remove(&self, user_id: &str) -> Result<()> {
        let mut blob = self.load_blob()?;
        if blob.remove(user_id).is_some() {
            let json = serde_json::to_string(&blob)?;
            self.store.set(STORAGE_KEY, &json)?;
            debug!(user = %user_id, "Removed user preferences");
        }
        Ok(())
    }

    fn load_blob(&self) -> Result<PreferencesBlob> {
        match self.store.get(STORAGE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(PreferencesBlob::new()),
        }
    }

    fn check_version(metadata: &PreferencesMetadata) -> Result<()> {
        // Migration branch point: new versions get a migration arm here.
        match metadata.schema_version {
            SCHEMA_VERSION => Ok(()),
            other => Err(Error::internal(format!(
                "unsupported preferences schema version {other} (expected {SCHEMA_VERSION})"
            ))),
        }
    }
}
