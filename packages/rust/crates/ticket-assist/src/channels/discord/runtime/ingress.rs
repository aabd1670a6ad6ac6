use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tokio::sync::mpsc;

use crate::channels::traits::IngressEvent;

use super::super::parsing::parse_ingress_event;
use super::config::DISCORD_DEFAULT_INGRESS_PATH;

/// Header carrying the shared secret configured for the ingress endpoint.
pub const DISCORD_INGRESS_SECRET_HEADER: &str = "x-ticket-assist-ingress-token";

/// Built ingress components for handler testing and runtime wiring.
pub struct DiscordIngressApp {
    /// Axum router that serves the ingress endpoint.
    pub app: Router,
    /// Normalized ingress route path.
    pub path: String,
}

/// Build the ingress app that forwards parsed events into `tx`.
pub fn build_discord_ingress_app(
    ingress_path: &str,
    secret_token: Option<String>,
    tx: mpsc::Sender<IngressEvent>,
) -> DiscordIngressApp {
    let ingress_state = DiscordIngressState {
        tx,
        secret_token: secret_token.filter(|token| !token.trim().is_empty()),
    };

    let path = normalize_ingress_path(ingress_path);
    let app = Router::new()
        .route(&path, post(discord_ingress_handler))
        .with_state(ingress_state);

    DiscordIngressApp { app, path }
}

#[derive(Clone)]
struct DiscordIngressState {
    tx: mpsc::Sender<IngressEvent>,
    secret_token: Option<String>,
}

fn normalize_ingress_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        DISCORD_DEFAULT_INGRESS_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

async fn discord_ingress_handler(
    State(state): State<DiscordIngressState>,
    headers: HeaderMap,
    Json(envelope): Json<serde_json::Value>,
) -> Result<StatusCode, (StatusCode, String)> {
    if let Some(expected) = state.secret_token.as_deref() {
        let provided = headers
            .get(DISCORD_INGRESS_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if provided != expected {
            return Err((
                StatusCode::UNAUTHORIZED,
                "invalid ingress secret token".to_string(),
            ));
        }
    }

    let Some(event) = parse_ingress_event(&envelope) else {
        tracing::debug!(
            event_type = envelope.get("t").and_then(|t| t.as_str()).unwrap_or("<none>"),
            "discord ingress ignored event"
        );
        return Ok(StatusCode::OK);
    };

    tracing::debug!(?event, "discord ingress parsed event");
    if state.tx.send(event).await.is_err() {
        tracing::error!("discord inbound queue unavailable");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "inbound queue unavailable".to_string(),
        ));
    }
    Ok(StatusCode::OK)
}
