use serde_json::Value;

use crate::channels::traits::{InboundMessage, IngressEvent, TicketOpened};

use super::constants::{
    EVENT_CHANNEL_DELETE, EVENT_CONFIG_RELOAD, EVENT_MESSAGE_CREATE, EVENT_TICKET_CLOSED,
    EVENT_TICKET_MAIN_MESSAGE_CREATED,
};

/// Parse a gateway-style envelope (`{"t": <type>, "d": <payload>}`) into an ingress event.
///
/// Payload shapes (subset):
/// - `MESSAGE_CREATE`: `id`, `channel_id`, `content`, `author.id`, optional
///   `author.bot`, optional `member.roles`
/// - `TICKET_MAIN_MESSAGE_CREATED`: `ticket.id`, `ticket.option.id` (or
///   `ticket.option_id`), `channel_id`, `user.id`
/// - `TICKET_CLOSED`: `channel_id`
/// - `CHANNEL_DELETE`: `id`
/// - `CONFIG_RELOAD`: no payload
///
/// Returns `None` for unknown event types and malformed payloads.
pub fn parse_ingress_event(envelope: &Value) -> Option<IngressEvent> {
    let event_type = envelope.get("t").and_then(Value::as_str)?;
    let payload = envelope.get("d").unwrap_or(&Value::Null);
    match event_type {
        EVENT_MESSAGE_CREATE => parse_message_create(payload).map(IngressEvent::Message),
        EVENT_TICKET_MAIN_MESSAGE_CREATED => {
            parse_ticket_opened(payload).map(IngressEvent::TicketOpened)
        }
        EVENT_TICKET_CLOSED => {
            id_field(payload, "channel_id").map(|channel_id| IngressEvent::TicketEnded { channel_id })
        }
        EVENT_CHANNEL_DELETE => {
            id_field(payload, "id").map(|channel_id| IngressEvent::TicketEnded { channel_id })
        }
        EVENT_CONFIG_RELOAD => Some(IngressEvent::ConfigReload),
        _ => None,
    }
}

fn parse_message_create(payload: &Value) -> Option<InboundMessage> {
    let message_id = id_field(payload, "id")?;
    let channel_id = id_field(payload, "channel_id")?;
    let author = payload.get("author")?;
    let author_id = id_field(author, "id")?;
    let author_is_bot = author.get("bot").and_then(Value::as_bool).unwrap_or(false);
    let member_roles = payload
        .get("member")
        .and_then(|member| member.get("roles"))
        .and_then(Value::as_array)
        .map(|roles| roles.iter().filter_map(id_value).collect())
        .unwrap_or_default();
    let content = payload
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(InboundMessage {
        message_id,
        channel_id,
        author_id,
        author_is_bot,
        member_roles,
        content,
    })
}

fn parse_ticket_opened(payload: &Value) -> Option<TicketOpened> {
    let ticket = payload.get("ticket")?;
    let ticket_id = id_field(ticket, "id")?;
    let option_id = ticket
        .get("option")
        .and_then(|option| id_field(option, "id"))
        .or_else(|| id_field(ticket, "option_id"))
        .unwrap_or_default();
    let channel_id = id_field(payload, "channel_id")?;
    let owner_user_id = payload.get("user").and_then(|user| id_field(user, "id"))?;

    Some(TicketOpened {
        ticket_id,
        option_id,
        channel_id,
        owner_user_id,
    })
}

fn id_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(id_value)
}

/// Snowflakes arrive as strings; tolerate numeric ids from relays.
fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.trim().to_string()).filter(|id| !id.is_empty()),
        Value::Number(number) => number.as_u64().map(|id| id.to_string()),
        _ => None,
    }
}
