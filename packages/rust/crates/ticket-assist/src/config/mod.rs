//! Config namespace: plugin JSON documents and runtime settings.

mod panels;
mod plugin;
mod prompts;
mod settings;
mod store;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

pub use panels::{Panel, PanelTable};
pub use plugin::{AssistConfig, DEFAULT_MAX_ASSISTANT_MESSAGES, role_mention};
pub use prompts::{DEFAULT_PROMPT_KEY, PromptTable};
pub use settings::{
    AssistantSettings, DiscordSettings, PluginSettings, RuntimeSettings, load_runtime_settings,
    load_runtime_settings_from_paths, runtime_settings_paths,
};
pub use store::{
    CONFIG_FILE_NAME, ConfigStore, FileConfigStore, InMemoryConfigStore, PROMPTS_FILE_NAME,
};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
