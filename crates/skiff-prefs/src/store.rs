use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Asynchronous storage backend for preference sets.
///
/// The primary (connection) preference set lives alongside an open-ended
/// collection of terminal profiles keyed by opaque string ids. Preference
/// contents are treated as opaque JSON documents; the synchronizer never
/// inspects individual option semantics.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn read_settings(&self) -> Result<Value, StoreError>;

    async fn write_settings(&self, settings: Value) -> Result<(), StoreError>;

    async fn read_profile(&self, id: &str) -> Result<Value, StoreError>;

    async fn write_profile(&self, id: &str, prefs: Value) -> Result<(), StoreError>;
}

/// Lists the profile ids currently known to a backend.
#[async_trait]
pub trait ProfileEnumerator: Send + Sync {
    async fn list_profiles(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory adapter for tests and early wiring.
#[derive(Default)]
pub struct InMemoryProfileStore {
    settings: Mutex<Value>,
    profiles: Mutex<HashMap<String, Value>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            settings: Mutex::new(Value::Object(Default::default())),
            profiles: Mutex::new(HashMap::new()),
        })
    }

    pub async fn set_settings(&self, settings: Value) {
        *self.settings.lock().await = settings;
    }

    pub async fn insert_profile(&self, id: impl Into<String>, prefs: Value) {
        self.profiles.lock().await.insert(id.into(), prefs);
    }

    /// Snapshot of the current contents, for assertions.
    pub async fn snapshot(&self) -> (Value, HashMap<String, Value>) {
        let settings = self.settings.lock().await.clone();
        let profiles = self.profiles.lock().await.clone();
        (settings, profiles)
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn read_settings(&self) -> Result<Value, StoreError> {
        Ok(self.settings.lock().await.clone())
    }

    async fn write_settings(&self, settings: Value) -> Result<(), StoreError> {
        *self.settings.lock().await = settings;
        Ok(())
    }

    async fn read_profile(&self, id: &str) -> Result<Value, StoreError> {
        self.profiles
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::ProfileNotFound(id.to_string()))
    }

    async fn write_profile(&self, id: &str, prefs: Value) -> Result<(), StoreError> {
        self.profiles.lock().await.insert(id.to_string(), prefs);
        Ok(())
    }
}

#[async_trait]
impl ProfileEnumerator for InMemoryProfileStore {
    async fn list_profiles(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.profiles.lock().await.keys().cloned().collect())
    }
}
