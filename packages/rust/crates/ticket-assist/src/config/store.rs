//! Read-only repositories over the plugin documents.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ConfigError;

use super::{AssistConfig, PanelTable, PromptTable};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const PROMPTS_FILE_NAME: &str = "prompts.json";

/// Source of plugin configuration for session creation.
pub trait ConfigStore: Send + Sync {
    fn assist_config(&self) -> Result<Arc<AssistConfig>, ConfigError>;

    fn prompts(&self) -> Result<Arc<PromptTable>, ConfigError>;

    /// Panel table as of now; callers ask once per ticket event.
    fn panels(&self) -> Result<PanelTable, ConfigError>;

    /// Re-read cached documents.
    fn reload(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[derive(Debug)]
struct LoadedDocuments {
    config: Arc<AssistConfig>,
    prompts: Arc<PromptTable>,
}

/// JSON-file backed store.
///
/// `config.json` and `prompts.json` are cached from construction until
/// [`ConfigStore::reload`]; `panels.json` is read on every call.
#[derive(Debug)]
pub struct FileConfigStore {
    config_path: PathBuf,
    prompts_path: PathBuf,
    panels_path: PathBuf,
    loaded: RwLock<LoadedDocuments>,
}

impl FileConfigStore {
    /// Load `config.json` and `prompts.json` from `plugin_dir`.
    pub fn open(plugin_dir: &Path, panels_path: &Path) -> Result<Self, ConfigError> {
        let config_path = plugin_dir.join(CONFIG_FILE_NAME);
        let prompts_path = plugin_dir.join(PROMPTS_FILE_NAME);
        let loaded = load_documents(&config_path, &prompts_path)?;
        tracing::info!(
            config = %config_path.display(),
            prompts = %prompts_path.display(),
            panels = %panels_path.display(),
            prompt_options = loaded.prompts.option_count(),
            "plugin configuration loaded"
        );
        Ok(Self {
            config_path,
            prompts_path,
            panels_path: panels_path.to_path_buf(),
            loaded: RwLock::new(loaded),
        })
    }

    pub fn panels_path(&self) -> &Path {
        &self.panels_path
    }
}

fn load_documents(config_path: &Path, prompts_path: &Path) -> Result<LoadedDocuments, ConfigError> {
    Ok(LoadedDocuments {
        config: Arc::new(AssistConfig::load(config_path)?),
        prompts: Arc::new(PromptTable::load(prompts_path)?),
    })
}

impl ConfigStore for FileConfigStore {
    fn assist_config(&self) -> Result<Arc<AssistConfig>, ConfigError> {
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(&loaded.config))
    }

    fn prompts(&self) -> Result<Arc<PromptTable>, ConfigError> {
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(&loaded.prompts))
    }

    fn panels(&self) -> Result<PanelTable, ConfigError> {
        PanelTable::load(&self.panels_path)
    }

    fn reload(&self) -> Result<(), ConfigError> {
        let fresh = load_documents(&self.config_path, &self.prompts_path)?;
        *self.loaded.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        tracing::info!(config = %self.config_path.display(), "plugin configuration reloaded");
        Ok(())
    }
}

/// Fixed documents, for tests and embedding.
#[derive(Debug, Clone)]
pub struct InMemoryConfigStore {
    config: Arc<AssistConfig>,
    prompts: Arc<PromptTable>,
    panels: PanelTable,
}

impl InMemoryConfigStore {
    pub fn new(config: AssistConfig, prompts: PromptTable, panels: PanelTable) -> Self {
        Self {
            config: Arc::new(config),
            prompts: Arc::new(prompts),
            panels,
        }
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn assist_config(&self) -> Result<Arc<AssistConfig>, ConfigError> {
        Ok(Arc::clone(&self.config))
    }

    fn prompts(&self) -> Result<Arc<PromptTable>, ConfigError> {
        Ok(Arc::clone(&self.prompts))
    }

    fn panels(&self) -> Result<PanelTable, ConfigError> {
        Ok(self.panels.clone())
    }
}
