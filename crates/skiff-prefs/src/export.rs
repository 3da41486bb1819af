use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::blob::PrefsBlob;
use crate::error::PrefsError;
use crate::fanout::{join_keyed, DEFAULT_DEADLINE};
use crate::store::{ProfileEnumerator, ProfileStore};

/// Builds a portable preference blob from an injected storage backend.
pub struct PrefsExporter {
    store: Arc<dyn ProfileStore>,
    profiles: Arc<dyn ProfileEnumerator>,
    deadline: Duration,
}

impl PrefsExporter {
    pub fn new(store: Arc<dyn ProfileStore>, profiles: Arc<dyn ProfileEnumerator>) -> Self {
        Self {
            store,
            profiles,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Export the primary preference set plus every known terminal profile.
    ///
    /// The primary set is read before enumeration begins. Profile reads run
    /// concurrently; the returned blob has exactly one populated entry per
    /// enumerated profile id regardless of the order reads complete in.
    pub async fn export(&self) -> Result<PrefsBlob, PrefsError> {
        let settings = self.store.read_settings().await?;
        let mut blob = PrefsBlob::new(settings);

        let ids = self.profiles.list_profiles().await?;
        if ids.is_empty() {
            return Ok(blob);
        }

        debug!(profiles = ids.len(), "exporting terminal profiles");
        let reads: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let store = Arc::clone(&self.store);
                let profile = id.clone();
                (id, async move { store.read_profile(&profile).await })
            })
            .collect();
        for (id, prefs) in join_keyed(reads, self.deadline).await? {
            blob.hterm.insert(id, Some(prefs));
        }
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FanOutError, StoreError};
    use crate::store::InMemoryProfileStore;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Store wrapper that counts reads and can delay or fail per profile.
    struct InstrumentedStore {
        inner: Arc<InMemoryProfileStore>,
        reads: AtomicUsize,
        delays_ms: Vec<(String, u64)>,
        failing: Vec<String>,
    }

    impl InstrumentedStore {
        fn new(inner: Arc<InMemoryProfileStore>) -> Self {
            Self {
                inner,
                reads: AtomicUsize::new(0),
                delays_ms: Vec::new(),
                failing: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl ProfileStore for InstrumentedStore {
        async fn read_settings(&self) -> Result<Value, StoreError> {
            self.inner.read_settings().await
        }

        async fn write_settings(&self, settings: Value) -> Result<(), StoreError> {
            self.inner.write_settings(settings).await
        }

        async fn read_profile(&self, id: &str) -> Result<Value, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|f| f == id) {
                return Err(StoreError::Store(format!("injected failure for {id}")));
            }
            if let Some((_, ms)) = self.delays_ms.iter().find(|(d, _)| d == id) {
                sleep(Duration::from_millis(*ms)).await;
            }
            self.inner.read_profile(id).await
        }

        async fn write_profile(&self, id: &str, prefs: Value) -> Result<(), StoreError> {
            self.inner.write_profile(id, prefs).await
        }
    }

    #[async_trait]
    impl ProfileEnumerator for InstrumentedStore {
        async fn list_profiles(&self) -> Result<Vec<String>, StoreError> {
            self.inner.list_profiles().await
        }
    }

    #[tokio::test]
    async fn empty_enumeration_exports_without_reads() {
        let store = Arc::new(InstrumentedStore::new(InMemoryProfileStore::new()));
        let exporter = PrefsExporter::new(store.clone(), store.clone());
        let blob = exporter.export().await.unwrap();
        assert!(blob.hterm.is_empty());
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        blob.validate_envelope().unwrap();
    }

    #[tokio::test]
    async fn out_of_order_reads_land_under_their_own_ids() {
        let inner = InMemoryProfileStore::new();
        inner.set_settings(json!({"theme": "dark"})).await;
        inner.insert_profile("slow", json!({"rows": 50})).await;
        inner.insert_profile("medium", json!({"rows": 40})).await;
        inner.insert_profile("fast", json!({"rows": 30})).await;
        let mut store = InstrumentedStore::new(inner);
        store.delays_ms = vec![
            ("slow".to_string(), 40),
            ("medium".to_string(), 20),
            ("fast".to_string(), 1),
        ];
        let store = Arc::new(store);

        let exporter = PrefsExporter::new(store.clone(), store.clone());
        let blob = exporter.export().await.unwrap();

        assert_eq!(blob.nassh, json!({"theme": "dark"}));
        assert_eq!(blob.hterm.len(), 3);
        assert_eq!(blob.hterm["slow"], Some(json!({"rows": 50})));
        assert_eq!(blob.hterm["medium"], Some(json!({"rows": 40})));
        assert_eq!(blob.hterm["fast"], Some(json!({"rows": 30})));
        assert!(blob.hterm.values().all(|entry| entry.is_some()));
    }

    #[tokio::test]
    async fn failing_profile_read_names_the_profile() {
        let inner = InMemoryProfileStore::new();
        inner.insert_profile("good", json!({})).await;
        inner.insert_profile("bad", json!({})).await;
        let mut store = InstrumentedStore::new(inner);
        store.failing = vec!["bad".to_string()];
        let store = Arc::new(store);

        let exporter = PrefsExporter::new(store.clone(), store.clone());
        let err = exporter.export().await.unwrap_err();
        match err {
            PrefsError::FanOut(FanOutError::MemberFailed(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].0, "bad");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
