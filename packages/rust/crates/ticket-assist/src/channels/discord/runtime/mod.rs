//! Discord runtime wiring (ingress endpoint + event dispatch loop).

mod config;
mod dispatch;
mod ingress;
mod run;

pub use config::{
    DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY, DISCORD_DEFAULT_INGRESS_BIND,
    DISCORD_DEFAULT_INGRESS_PATH, DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY, DiscordRuntimeConfig,
};
pub use dispatch::dispatch_ingress_event;
pub use ingress::{DISCORD_INGRESS_SECRET_HEADER, DiscordIngressApp, build_discord_ingress_app};
pub use run::run_discord_ingress;
