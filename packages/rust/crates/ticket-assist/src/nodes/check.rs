use anyhow::Context;

use ticket_assist::{
    ConfigStore, FileConfigStore, MessageKey, RuntimeSettings, Translations,
};

use crate::cli::PluginArgs;

use super::plugin::resolve_plugin_paths;

pub(crate) fn run_check_mode(
    args: PluginArgs,
    runtime_settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let paths = resolve_plugin_paths(args, &runtime_settings.plugin);
    let store = FileConfigStore::open(&paths.plugin_dir, &paths.panels).with_context(|| {
        format!(
            "failed to load plugin documents from {}",
            paths.plugin_dir.display()
        )
    })?;
    let config = store.assist_config()?;
    let prompts = store.prompts()?;
    let panels = store.panels()?;
    let translations = match paths.languages.as_deref() {
        Some(path) => Translations::load(path)?,
        None => Translations::bundled(),
    };

    let assisted_panels = panels.iter().filter(|panel| panel.enable_ia).count();
    let mut languages: Vec<&str> = translations.languages().collect();
    languages.sort_unstable();

    println!("plugin dir: {}", paths.plugin_dir.display());
    println!("panels: {}", paths.panels.display());
    println!(
        "enabled={} language={} message_limit={}",
        config.enabled,
        config.language(),
        config.message_limit()
    );
    println!(
        "staff role: {}; dev role: {}",
        config.staff_role_id().unwrap_or("<unset>"),
        config.dev_role_id().unwrap_or("<unset>")
    );
    println!("prompts: default + {} option override(s)", prompts.option_count());
    println!(
        "panels: {} total, {} with assistance enabled",
        panels.len(),
        assisted_panels
    );
    println!("languages: {}", languages.join(", "));
    println!(
        "welcome ({}): {}",
        config.language(),
        translations.resolve(config.language(), MessageKey::Welcome, &[])
    );
    if config.api_key.trim().is_empty() || config.assistant_key.trim().is_empty() {
        anyhow::bail!("config.json must set both apiKey and assistantKey");
    }
    Ok(())
}
