use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::blob::PrefsBlob;
use crate::error::PrefsError;
use crate::fanout::{join_keyed, DEFAULT_DEADLINE};
use crate::store::ProfileStore;

/// Applies a portable preference blob to an injected storage backend.
pub struct PrefsImporter {
    store: Arc<dyn ProfileStore>,
    deadline: Duration,
}

impl PrefsImporter {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Import a blob, creating or overwriting only the profiles it names.
    ///
    /// The envelope is validated before any storage call. Primary settings
    /// are merged key-wise so options absent from the blob survive; each
    /// named profile's document is replaced wholesale. Null profile entries
    /// (possible in hand-edited blobs) are skipped, never used to clear a
    /// profile. Profiles not mentioned in the blob are untouched.
    pub async fn import(&self, blob: &PrefsBlob) -> Result<(), PrefsError> {
        blob.validate_envelope()?;

        let existing = self.store.read_settings().await?;
        self.store
            .write_settings(merge_settings(existing, &blob.nassh))
            .await?;

        let writes: Vec<_> = blob
            .hterm
            .iter()
            .filter_map(|(id, entry)| {
                let prefs = entry.clone()?;
                let store = Arc::clone(&self.store);
                let profile = id.clone();
                Some((id.clone(), async move {
                    store.write_profile(&profile, prefs).await
                }))
            })
            .collect();
        if writes.is_empty() {
            return Ok(());
        }
        debug!(profiles = writes.len(), "importing terminal profiles");
        join_keyed(writes, self.deadline).await?;
        Ok(())
    }
}

/// Overlay incoming options onto the existing settings document.
///
/// Options present only in `existing` are kept; a non-object incoming
/// document replaces the settings outright.
fn merge_settings(existing: Value, incoming: &Value) -> Value {
    match (existing, incoming) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (option, value) in overlay {
                base.insert(option.clone(), value.clone());
            }
            Value::Object(base)
        }
        (_, incoming) => incoming.clone(),
    }
}
