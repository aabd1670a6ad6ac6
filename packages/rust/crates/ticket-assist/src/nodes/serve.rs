use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use ticket_assist::{
    AssistantBackend, Channel, ConfigStore, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RUN_TIMEOUT_SECS, DISCORD_DEFAULT_API_BASE, DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY,
    DISCORD_DEFAULT_INGRESS_BIND, DISCORD_DEFAULT_INGRESS_PATH,
    DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY, DiscordChannel, DiscordRuntimeConfig,
    FileConfigStore, OPENAI_DEFAULT_API_BASE, OpenAiAssistantClient, RunPollPolicy,
    RuntimeSettings, SessionController, SessionRegistry, Translations, run_discord_ingress,
};

use crate::cli::ServeArgs;
use crate::resolve::{
    resolve_optional_string, resolve_positive_u32, resolve_positive_u64, resolve_positive_usize,
    resolve_string,
};

use super::plugin::resolve_plugin_paths;

pub(crate) async fn run_serve_mode(
    args: ServeArgs,
    runtime_settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let ServeArgs {
        plugin,
        bot_token,
        ingress_bind,
        ingress_path,
        ingress_secret_token,
        inbound_queue_capacity,
        session_queue_capacity,
        poll_interval_ms,
        run_timeout_secs,
        max_poll_attempts,
        verbose: _,
    } = args;

    let token = resolve_optional_string(bot_token, "DISCORD_BOT_TOKEN", None)
        .ok_or_else(|| anyhow::anyhow!("--bot-token or DISCORD_BOT_TOKEN required"))?;

    let paths = resolve_plugin_paths(plugin, &runtime_settings.plugin);
    let store = FileConfigStore::open(&paths.plugin_dir, &paths.panels).with_context(|| {
        format!(
            "failed to load plugin documents from {}",
            paths.plugin_dir.display()
        )
    })?;
    let config = store.assist_config()?;
    if config.api_key.trim().is_empty() || config.assistant_key.trim().is_empty() {
        anyhow::bail!("config.json must set both apiKey and assistantKey");
    }
    let translations = Arc::new(Translations::load_or_bundled(paths.languages.as_deref()));

    let discord_api_base = resolve_string(
        None,
        "TICKET_ASSIST_DISCORD_API_BASE",
        runtime_settings.discord.api_base_url.as_deref(),
        DISCORD_DEFAULT_API_BASE,
    );
    let assistant_api_base = resolve_string(
        None,
        "TICKET_ASSIST_OPENAI_API_BASE",
        runtime_settings.assistant.api_base_url.as_deref(),
        OPENAI_DEFAULT_API_BASE,
    );
    let poll_policy = RunPollPolicy {
        interval: Duration::from_millis(resolve_positive_u64(
            poll_interval_ms,
            "TICKET_ASSIST_POLL_INTERVAL_MS",
            runtime_settings.assistant.poll_interval_ms,
            DEFAULT_POLL_INTERVAL_MS,
        )),
        timeout: Duration::from_secs(resolve_positive_u64(
            run_timeout_secs,
            "TICKET_ASSIST_RUN_TIMEOUT_SECS",
            runtime_settings.assistant.run_timeout_secs,
            DEFAULT_RUN_TIMEOUT_SECS,
        )),
        max_attempts: resolve_positive_u32(
            max_poll_attempts,
            "TICKET_ASSIST_MAX_POLL_ATTEMPTS",
            runtime_settings.assistant.max_poll_attempts,
            DEFAULT_MAX_POLL_ATTEMPTS,
        ),
    };

    let runtime_config = DiscordRuntimeConfig {
        bind_addr: resolve_string(
            ingress_bind,
            "TICKET_ASSIST_INGRESS_BIND",
            runtime_settings.discord.ingress_bind.as_deref(),
            DISCORD_DEFAULT_INGRESS_BIND,
        ),
        ingress_path: resolve_string(
            ingress_path,
            "TICKET_ASSIST_INGRESS_PATH",
            runtime_settings.discord.ingress_path.as_deref(),
            DISCORD_DEFAULT_INGRESS_PATH,
        ),
        secret_token: resolve_optional_string(
            ingress_secret_token,
            "TICKET_ASSIST_INGRESS_SECRET_TOKEN",
            runtime_settings.discord.ingress_secret_token.as_deref(),
        ),
        inbound_queue_capacity: resolve_positive_usize(
            inbound_queue_capacity,
            "TICKET_ASSIST_INBOUND_QUEUE_CAPACITY",
            runtime_settings.discord.inbound_queue_capacity,
            DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY,
        ),
        session_queue_capacity: resolve_positive_usize(
            session_queue_capacity,
            "TICKET_ASSIST_SESSION_QUEUE_CAPACITY",
            runtime_settings.discord.session_queue_capacity,
            DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY,
        ),
    };

    let channel: Arc<dyn Channel> =
        Arc::new(DiscordChannel::new_with_base_url(token, discord_api_base));
    let assistant: Arc<dyn AssistantBackend> = Arc::new(
        OpenAiAssistantClient::new_with_base_url(config.api_key.clone(), assistant_api_base),
    );
    tracing::info!(
        plugin_dir = %paths.plugin_dir.display(),
        panels = %paths.panels.display(),
        enabled = config.enabled,
        language = %config.language(),
        message_limit = config.message_limit(),
        poll_interval_ms = poll_policy.interval.as_millis(),
        run_timeout_secs = poll_policy.timeout.as_secs(),
        max_poll_attempts = poll_policy.max_attempts,
        "ticket assistant configured"
    );

    let controller = Arc::new(SessionController::new(
        assistant,
        channel,
        translations,
        poll_policy,
    ));
    let store: Arc<dyn ConfigStore> = Arc::new(store);
    let registry = Arc::new(SessionRegistry::with_queue_capacity(
        controller,
        store,
        runtime_config.session_queue_capacity,
    ));
    run_discord_ingress(registry, runtime_config).await
}
