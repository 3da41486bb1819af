use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use serde_json::Value;
use tracing::debug;

use skiff_prefs::{ProfileEnumerator, ProfileStore, StoreError};

/// File-backed profile store: one JSON document per profile under
/// `<data-dir>/profiles/<id>.json`, primary settings at
/// `<data-dir>/settings.json`.
pub struct FsProfileStore {
    settings_path: PathBuf,
    profiles_dir: PathBuf,
}

impl FsProfileStore {
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        let root = match data_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("sh", "skiff", "skiff")
                .ok_or_else(|| {
                    StoreError::Store(
                        "could not determine a data directory; pass --data-dir".to_string(),
                    )
                })?
                .data_dir()
                .to_path_buf(),
        };
        debug!(root = %root.display(), "opening file-backed profile store");
        Ok(Self {
            settings_path: root.join("settings.json"),
            profiles_dir: root.join("profiles"),
        })
    }

    fn profile_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        // Profile ids become file names; refuse anything that could escape
        // the profiles directory.
        if id.is_empty() || id == "." || id == ".." || id.contains('/') || id.contains('\\') {
            return Err(StoreError::Store(format!("invalid profile id '{id}'")));
        }
        Ok(self.profiles_dir.join(format!("{id}.json")))
    }

    async fn read_document(path: &Path) -> Result<Option<Value>, StoreError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Store(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StoreError::Store(format!("corrupt document {}: {err}", path.display())))
    }

    async fn write_document(path: &Path, document: &Value) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                StoreError::Store(format!("failed to create {}: {err}", parent.display()))
            })?;
        }
        let text = serde_json::to_string_pretty(document)
            .map_err(|err| StoreError::Store(format!("failed to serialize document: {err}")))?;
        tokio::fs::write(path, text).await.map_err(|err| {
            StoreError::Store(format!("failed to write {}: {err}", path.display()))
        })
    }
}

#[async_trait]
impl ProfileStore for FsProfileStore {
    async fn read_settings(&self) -> Result<Value, StoreError> {
        // A fresh installation has no settings file yet.
        Ok(Self::read_document(&self.settings_path)
            .await?
            .unwrap_or_else(|| Value::Object(Default::default())))
    }

    async fn write_settings(&self, settings: Value) -> Result<(), StoreError> {
        Self::write_document(&self.settings_path, &settings).await
    }

    async fn read_profile(&self, id: &str) -> Result<Value, StoreError> {
        let path = self.profile_path(id)?;
        Self::read_document(&path)
            .await?
            .ok_or_else(|| StoreError::ProfileNotFound(id.to_string()))
    }

    async fn write_profile(&self, id: &str, prefs: Value) -> Result<(), StoreError> {
        let path = self.profile_path(id)?;
        Self::write_document(&path, &prefs).await
    }
}

#[async_trait]
impl ProfileEnumerator for FsProfileStore {
    async fn list_profiles(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.profiles_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Store(format!(
                    "failed to list {}: {err}",
                    self.profiles_dir.display()
                )))
            }
        };
        let mut ids = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|err| {
                StoreError::Store(format!(
                    "failed to list {}: {err}",
                    self.profiles_dir.display()
                ))
            })?;
            let Some(entry) = entry else { break };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        Ok(ids)
    }
}
