use std::path::{Path, PathBuf};

use ticket_assist::PluginSettings;

use crate::cli::PluginArgs;
use crate::resolve::{resolve_optional_path, resolve_path};

const DEFAULT_PLUGIN_DIR: &str = "packages/conf/plugin";
const PANELS_FILE_NAME: &str = "panels.json";

#[derive(Debug, Clone)]
pub(super) struct PluginPaths {
    pub(super) plugin_dir: PathBuf,
    pub(super) panels: PathBuf,
    pub(super) languages: Option<PathBuf>,
}

pub(super) fn resolve_plugin_paths(args: PluginArgs, settings: &PluginSettings) -> PluginPaths {
    let plugin_dir = resolve_path(
        args.plugin_dir,
        "TICKET_ASSIST_PLUGIN_DIR",
        settings.dir.as_deref(),
        Path::new(DEFAULT_PLUGIN_DIR),
    );
    let panels = resolve_path(
        args.panels,
        "TICKET_ASSIST_PANELS_PATH",
        settings.panels_path.as_deref(),
        &plugin_dir.join(PANELS_FILE_NAME),
    );
    let languages = resolve_optional_path(
        args.languages,
        "TICKET_ASSIST_LANGUAGES_PATH",
        settings.languages_path.as_deref(),
    );
    PluginPaths {
        plugin_dir,
        panels,
        languages,
    }
}
