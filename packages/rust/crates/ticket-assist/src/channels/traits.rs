//! Channel trait and inbound event types for chat platforms.

use async_trait::async_trait;

/// A chat message posted in a ticket channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: String,
    /// Ticket channel the message was posted in (reply target).
    pub channel_id: String,
    pub author_id: String,
    pub author_is_bot: bool,
    /// Role ids held by the author in the guild; empty outside guilds.
    pub member_roles: Vec<String>,
    pub content: String,
}

impl InboundMessage {
    pub fn has_role(&self, role_id: &str) -> bool {
        self.member_roles.iter().any(|role| role == role_id)
    }
}

/// The ticket platform finished posting a ticket's main message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOpened {
    pub ticket_id: String,
    /// Ticket option (category) id, used for panel and prompt lookup.
    pub option_id: String,
    pub channel_id: String,
    /// User who opened the ticket.
    pub owner_user_id: String,
}

/// Events accepted by the ingress endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngressEvent {
    TicketOpened(TicketOpened),
    Message(InboundMessage),
    /// Ticket closed or its channel deleted.
    TicketEnded { channel_id: String },
    ConfigReload,
}

/// Core channel trait: outbound side of a messaging platform.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Send a message through this channel.
    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()>;

    /// Signal that the bot is processing a response (e.g. "typing" indicator).
    async fn start_typing(&self, _recipient: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
