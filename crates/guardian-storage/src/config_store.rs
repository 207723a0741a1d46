//! Identity-provider configuration persistence.
//!
//! The configuration is kept as a JSON document holding a single
//! `keycloak-config` entry. The value is written verbatim, including the admin
//! password, and read back on startup. There is no schema versioning.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use guardian_core::{IdpConfig, CONFIG_STORAGE_KEY};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};

/// Store for the single identity-provider configuration object.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Loads the saved configuration, if any.
    async fn load(&self) -> StorageResult<Option<IdpConfig>>;

    /// Saves the configuration, replacing any previous value.
    async fn save(&self, config: &IdpConfig) -> StorageResult<()>;
}

/// JSON file backed configuration store.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Creates a store for the given file path. The file is created on first
    /// save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StorageResult<Map<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => Ok(map),
                _ => Err(StorageError::InvalidData(format!(
                    "{} is not a JSON object",
                    self.path.display()
                ))),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> StorageResult<Option<IdpConfig>> {
        let mut document = self.read_document().await?;
        match document.remove(CONFIG_STORAGE_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, config: &IdpConfig) -> StorageResult<()> {
        // Keep unrelated keys other tools may have written.
        let mut document = self.read_document().await?;
        document.insert(CONFIG_STORAGE_KEY.to_string(), serde_json::to_value(config)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&Value::Object(document))?;
        tokio::fs::write(&self.path, content).await?;
        tracing::info!(path = %self.path.display(), "identity provider configuration saved");
        Ok(())
    }
}

/// In-memory configuration store.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    config: RwLock<Option<IdpConfig>>,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a configuration.
    #[must_use]
    pub fn with_config(config: IdpConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load(&self) -> StorageResult<Option<IdpConfig>> {
        Ok(self.config.read().await.clone())
    }

    async fn save(&self, config: &IdpConfig) -> StorageResult<()> {
        *self.config.write().await = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IdpConfig {
        IdpConfig::new("https://sso.example.com", "acme", "console").with_admin("admin", "s3cret")
    }

    #[tokio::test]
    async fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("absent.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("nested").join("config.json"));

        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));
    }

    #[tokio::test]
    async fn document_uses_storage_key_and_plaintext_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::new(&path);

        store.save(&sample()).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &raw[CONFIG_STORAGE_KEY];
        assert_eq!(entry["serverUrl"], "https://sso.example.com");
        assert_eq!(entry["clientId"], "console");
        assert_eq!(entry["adminPassword"], "s3cret");
    }

    #[tokio::test]
    async fn save_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileConfigStore::new(&path);
        store.save(&sample()).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(CONFIG_STORAGE_KEY).is_some());
    }

    #[tokio::test]
    async fn non_object_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = FileConfigStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() {
        let store = InMemoryConfigStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));
    }
}
