//! `panels.json`: which ticket options get AI assistance.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

use super::read_json;

/// One ticket panel. Other panel fields in the document are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Panel {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, rename = "enableIA")]
    pub enable_ia: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PanelTable {
    panels: Vec<Panel>,
}

impl PanelTable {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// First panel listing the option.
    pub fn find_for_option(&self, option_id: &str) -> Option<&Panel> {
        self.panels
            .iter()
            .find(|panel| panel.options.iter().any(|option| option == option_id))
    }

    pub fn assistance_enabled_for(&self, option_id: &str) -> bool {
        self.find_for_option(option_id)
            .is_some_and(|panel| panel.enable_ia)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}
