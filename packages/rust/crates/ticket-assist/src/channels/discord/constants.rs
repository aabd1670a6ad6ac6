//! Discord channel constants.

/// Discord REST API base URL.
pub const DISCORD_DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Maximum message size accepted by Discord `Create Message`.
pub const DISCORD_MAX_MESSAGE_LENGTH: usize = 2000;

/// Gateway dispatch type for new channel messages.
pub(super) const EVENT_MESSAGE_CREATE: &str = "MESSAGE_CREATE";
/// Gateway dispatch type for deleted channels.
pub(super) const EVENT_CHANNEL_DELETE: &str = "CHANNEL_DELETE";
/// Ticket platform: main ticket message posted, ticket ready for assistance.
pub(super) const EVENT_TICKET_MAIN_MESSAGE_CREATED: &str = "TICKET_MAIN_MESSAGE_CREATED";
/// Ticket platform: ticket closed.
pub(super) const EVENT_TICKET_CLOSED: &str = "TICKET_CLOSED";
/// Operator request to re-read plugin configuration.
pub(super) const EVENT_CONFIG_RELOAD: &str = "CONFIG_RELOAD";
