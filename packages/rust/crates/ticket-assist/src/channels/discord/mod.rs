//! Discord channel integration: REST delivery plus an HTTP ingress for relayed gateway events.

mod channel;
mod constants;
mod parsing;
mod runtime;
mod send;

pub use channel::DiscordChannel;
pub use constants::{DISCORD_DEFAULT_API_BASE, DISCORD_MAX_MESSAGE_LENGTH};
pub use parsing::parse_ingress_event;
pub use runtime::{
    DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY, DISCORD_DEFAULT_INGRESS_BIND,
    DISCORD_DEFAULT_INGRESS_PATH, DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY,
    DISCORD_INGRESS_SECRET_HEADER, DiscordIngressApp, DiscordRuntimeConfig,
    build_discord_ingress_app, dispatch_ingress_event, run_discord_ingress,
};
pub use send::split_message_for_discord;
