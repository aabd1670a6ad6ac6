use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ticket-assist")]
#[command(
    about = "Ticket assistant: relays ticket owners to an OpenAI assistant until staff takes over."
)]
pub(crate) struct Cli {
    /// Override config home directory (user `ticket-assist/settings.yaml` lives under it).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Serve the ingress endpoint and assist newly opened tickets.
    Serve(ServeArgs),
    /// Load plugin documents and report what was found, then exit.
    Check(PluginArgs),
}

impl Command {
    pub(crate) fn verbose(&self) -> bool {
        matches!(self, Self::Serve(ServeArgs { verbose: true, .. }))
    }
}

/// Locations of the plugin documents.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PluginArgs {
    /// Directory holding `config.json` and `prompts.json` (or TICKET_ASSIST_PLUGIN_DIR env).
    #[arg(long)]
    pub(crate) plugin_dir: Option<PathBuf>,

    /// Path to `panels.json` (or TICKET_ASSIST_PANELS_PATH env; default `<plugin-dir>/panels.json`).
    #[arg(long)]
    pub(crate) panels: Option<PathBuf>,

    /// Path to a `languages.json` replacing the bundled translations (or TICKET_ASSIST_LANGUAGES_PATH env).
    #[arg(long)]
    pub(crate) languages: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub(crate) plugin: PluginArgs,

    /// Discord bot token (or DISCORD_BOT_TOKEN env).
    #[arg(long)]
    pub(crate) bot_token: Option<String>,

    /// Ingress listen address (default: 0.0.0.0:8082).
    #[arg(long)]
    pub(crate) ingress_bind: Option<String>,

    /// Ingress route path (default: /discord/ingress).
    #[arg(long)]
    pub(crate) ingress_path: Option<String>,

    /// Shared secret expected in `x-ticket-assist-ingress-token` (or TICKET_ASSIST_INGRESS_SECRET_TOKEN env).
    #[arg(long)]
    pub(crate) ingress_secret_token: Option<String>,

    /// Inbound event queue capacity (default: 512).
    #[arg(long)]
    pub(crate) inbound_queue_capacity: Option<usize>,

    /// Per-ticket message queue capacity (default: 32).
    #[arg(long)]
    pub(crate) session_queue_capacity: Option<usize>,

    /// Delay between run status checks in milliseconds (default: 1000).
    #[arg(long)]
    pub(crate) poll_interval_ms: Option<u64>,

    /// Upper bound on one assistant run in seconds (default: 120).
    #[arg(long)]
    pub(crate) run_timeout_secs: Option<u64>,

    /// Upper bound on run status checks per turn (default: 120).
    #[arg(long)]
    pub(crate) max_poll_attempts: Option<u32>,

    /// Debug logging for ticket_assist (RUST_LOG still takes precedence).
    #[arg(long, short)]
    pub(crate) verbose: bool,
}
