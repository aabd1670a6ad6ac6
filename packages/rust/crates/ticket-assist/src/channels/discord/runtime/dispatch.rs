use crate::channels::traits::IngressEvent;
use crate::session::SessionRegistry;

/// Apply one ingress event to the session registry.
pub async fn dispatch_ingress_event(registry: &SessionRegistry, event: IngressEvent) {
    match event {
        IngressEvent::TicketOpened(ticket) => {
            registry.open_ticket(ticket).await;
        }
        IngressEvent::Message(message) => registry.route_message(message).await,
        IngressEvent::TicketEnded { channel_id } => {
            registry.close_ticket(&channel_id).await;
        }
        IngressEvent::ConfigReload => match registry.reload() {
            Ok(()) => tracing::info!("plugin configuration reloaded"),
            Err(error) => tracing::error!(
                error = %error,
                "plugin configuration reload failed; keeping previous documents"
            ),
        },
    }
}
