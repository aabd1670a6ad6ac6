//! `prompts.json`: ticket option id -> system prompt.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;

use super::read_json;

/// Key of the mandatory fallback prompt.
pub const DEFAULT_PROMPT_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTable {
    default_prompt: String,
    by_option: HashMap<String, String>,
}

impl PromptTable {
    pub fn new(
        default_prompt: impl Into<String>,
        by_option: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            default_prompt: default_prompt.into(),
            by_option: by_option.into_iter().collect(),
        }
    }

    /// Build from the raw document; `None` when `"default"` is missing.
    pub fn from_map(mut entries: HashMap<String, String>) -> Option<Self> {
        let default_prompt = entries.remove(DEFAULT_PROMPT_KEY)?;
        Some(Self {
            default_prompt,
            by_option: entries,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let entries: HashMap<String, String> = read_json(path)?;
        Self::from_map(entries).ok_or_else(|| ConfigError::MissingDefaultPrompt {
            path: path.to_path_buf(),
        })
    }

    /// Prompt for a ticket option, or the default prompt.
    pub fn resolve(&self, option_id: &str) -> &str {
        self.by_option
            .get(option_id)
            .map(String::as_str)
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or(&self.default_prompt)
    }

    /// Number of option-specific prompts, not counting the default.
    pub fn option_count(&self) -> usize {
        self.by_option.len()
    }
}
