//! ticket-assist CLI: `serve` the ticket ingress or `check` plugin documents.
//!
//! Logging: set `RUST_LOG=ticket_assist=info` (or `warn`, `debug`) to see logs on stderr.

mod cli;
mod nodes;
mod resolve;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ticket_assist::load_runtime_settings;

use crate::cli::{Cli, Command};
use crate::nodes::{run_check_mode, run_serve_mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let runtime_settings = load_runtime_settings(cli.conf.as_deref());

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.command.verbose() {
            "ticket_assist=debug"
        } else {
            "ticket_assist=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Command::Serve(args) => run_serve_mode(args, &runtime_settings).await,
        Command::Check(args) => run_check_mode(args, &runtime_settings),
    }
}
