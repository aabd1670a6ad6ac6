//! Chat channels: outbound delivery and inbound ticket events.

mod discord;
mod traits;

pub use discord::{
    DISCORD_DEFAULT_API_BASE, DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY, DISCORD_DEFAULT_INGRESS_BIND,
    DISCORD_DEFAULT_INGRESS_PATH, DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY,
    DISCORD_INGRESS_SECRET_HEADER, DISCORD_MAX_MESSAGE_LENGTH, DiscordChannel, DiscordIngressApp,
    DiscordRuntimeConfig, build_discord_ingress_app, dispatch_ingress_event, parse_ingress_event,
    run_discord_ingress, split_message_for_discord,
};
pub use traits::{Channel, InboundMessage, IngressEvent, TicketOpened};
