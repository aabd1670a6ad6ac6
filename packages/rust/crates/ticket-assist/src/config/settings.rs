//! Runtime settings loader for ticket-assist.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/settings.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME or --conf>/ticket-assist/settings.yaml`
//!
//! Merge precedence is user over system.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/settings.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "ticket-assist/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    #[serde(default)]
    pub discord: DiscordSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub plugin: PluginSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordSettings {
    pub api_base_url: Option<String>,
    pub ingress_bind: Option<String>,
    pub ingress_path: Option<String>,
    pub ingress_secret_token: Option<String>,
    pub inbound_queue_capacity: Option<usize>,
    pub session_queue_capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantSettings {
    pub api_base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub run_timeout_secs: Option<u64>,
    pub max_poll_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginSettings {
    /// Directory holding `config.json` and `prompts.json`.
    pub dir: Option<String>,
    /// Ticket platform `panels.json`.
    pub panels_path: Option<String>,
    /// Optional `languages.json`; bundled translations otherwise.
    pub languages_path: Option<String>,
}

impl RuntimeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            discord: self.discord.merge(overlay.discord),
            assistant: self.assistant.merge(overlay.assistant),
            plugin: self.plugin.merge(overlay.plugin),
        }
    }
}

impl DiscordSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            api_base_url: overlay.api_base_url.or(self.api_base_url),
            ingress_bind: overlay.ingress_bind.or(self.ingress_bind),
            ingress_path: overlay.ingress_path.or(self.ingress_path),
            ingress_secret_token: overlay.ingress_secret_token.or(self.ingress_secret_token),
            inbound_queue_capacity: overlay
                .inbound_queue_capacity
                .or(self.inbound_queue_capacity),
            session_queue_capacity: overlay
                .session_queue_capacity
                .or(self.session_queue_capacity),
        }
    }
}

impl AssistantSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            api_base_url: overlay.api_base_url.or(self.api_base_url),
            poll_interval_ms: overlay.poll_interval_ms.or(self.poll_interval_ms),
            run_timeout_secs: overlay.run_timeout_secs.or(self.run_timeout_secs),
            max_poll_attempts: overlay.max_poll_attempts.or(self.max_poll_attempts),
        }
    }
}

impl PluginSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            dir: overlay.dir.or(self.dir),
            panels_path: overlay.panels_path.or(self.panels_path),
            languages_path: overlay.languages_path.or(self.languages_path),
        }
    }
}

/// Load merged runtime settings (user overrides system).
///
/// `conf_dir` replaces `PRJ_CONFIG_HOME` as the user config home.
pub fn load_runtime_settings(conf_dir: Option<&Path>) -> RuntimeSettings {
    let (system_path, user_path) = runtime_settings_paths(conf_dir);
    load_runtime_settings_from_paths(&system_path, &user_path)
}

/// System and user settings file locations.
///
/// Relative locations resolve against `PRJ_ROOT`, or the working directory
/// when it is unset.
pub fn runtime_settings_paths(conf_dir: Option<&Path>) -> (PathBuf, PathBuf) {
    let root = env_path("PRJ_ROOT")
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let config_home = conf_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| env_path("PRJ_CONFIG_HOME"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_HOME_RELATIVE_PATH));
    (
        root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH),
        root.join(config_home).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH),
    )
}

#[doc(hidden)]
pub fn load_runtime_settings_from_paths(system: &Path, user: &Path) -> RuntimeSettings {
    read_settings_file(system).merge(read_settings_file(user))
}

/// Missing files are empty; unreadable or malformed ones are skipped with a warning.
fn read_settings_file(path: &Path) -> RuntimeSettings {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => return RuntimeSettings::default(),
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "settings file unreadable; skipped");
            return RuntimeSettings::default();
        }
    };
    serde_yaml::from_str(&raw).unwrap_or_else(|error| {
        tracing::warn!(path = %path.display(), error = %error, "settings yaml malformed; skipped");
        RuntimeSettings::default()
    })
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
