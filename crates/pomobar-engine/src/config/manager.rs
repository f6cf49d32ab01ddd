//! Configuration manager

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use pomobar_core::{
    models::Config,
    storage::{init_config_dir, ConfigStorage},
    Result as CoreResult,
};

/// Config manager error
#[derive(Debug, thiserror::Error)]
pub enum ConfigManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] pomobar_core::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigManagerError>;

/// Manages application configuration
pub struct ConfigManager {
    storage: ConfigStorage,
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// Load `config.json` from the user's config directory.
    pub fn new() -> CoreResult<Self> {
        let config_dir = init_config_dir()?;
        Self::from_storage(ConfigStorage::new(config_dir))
    }

    pub fn from_file(path: PathBuf) -> CoreResult<Self> {
        Self::from_storage(ConfigStorage::with_file(path))
    }

    pub fn from_storage(storage: ConfigStorage) -> CoreResult<Self> {
        let config = storage.load()?;

        Ok(Self {
            storage,
            config: Arc::new(RwLock::new(config)),
        })
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    pub async fn get(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn update(&self, config: Config) -> Result<Config> {
        config
            .validate()
            .map_err(|e| ConfigManagerError::Invalid(e.to_string()))?;

        self.storage.save(&config)?;

        {
            let mut current = self.config.write().await;
            *current = config.clone();
        }

        Ok(config)
    }

    pub async fn update_notifications(
        &self,
        desktop: Option<bool>,
        bell: Option<bool>,
    ) -> Result<Config> {
        let mut config = self.get().await;

        if let Some(desktop) = desktop {
            config.notifications.desktop = desktop;
        }

        if let Some(bell) = bell {
            config.notifications.bell = bell;
        }

        self.update(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::from_file(temp_dir.path().join("config.json")).unwrap()
    }

    #[tokio::test]
    async fn test_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir);

        assert_eq!(manager.get().await, Config::default());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir);

        manager
            .update_notifications(Some(false), None)
            .await
            .unwrap();
        let mut config = manager.get().await;
        config.log_level = "debug".to_string();
        manager.update(config).await.unwrap();

        let reloaded = ConfigManager::from_file(temp_dir.path().join("config.json")).unwrap();
        let config = reloaded.get().await;
        assert!(!config.notifications.desktop);
        assert!(config.notifications.bell);
        assert_eq!(config.log_level, "debug");
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir);

        let mut config = manager.get().await;
        config.log_level = "verbose".to_string();
        let result = manager.update(config).await;
        assert!(matches!(result, Err(ConfigManagerError::Invalid(_))));
        assert_eq!(manager.get().await.log_level, "info");
    }
}
