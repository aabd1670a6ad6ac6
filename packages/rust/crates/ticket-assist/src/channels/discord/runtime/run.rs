use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::DiscordRuntimeConfig;
use super::dispatch::dispatch_ingress_event;
use super::ingress::{DiscordIngressApp, build_discord_ingress_app};
use crate::channels::traits::IngressEvent;
use crate::session::SessionRegistry;

/// Serve the ingress endpoint and drive ticket sessions until Ctrl+C.
pub async fn run_discord_ingress(
    registry: Arc<SessionRegistry>,
    runtime_config: DiscordRuntimeConfig,
) -> Result<()> {
    let DiscordRuntimeConfig {
        bind_addr,
        ingress_path,
        secret_token,
        inbound_queue_capacity,
        ..
    } = runtime_config;

    let (tx, mut inbound_rx) = mpsc::channel::<IngressEvent>(inbound_queue_capacity.max(1));
    let secured = secret_token.is_some();
    let DiscordIngressApp { app, path } =
        build_discord_ingress_app(&ingress_path, secret_token, tx);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind ingress listener on {bind_addr}"))?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let mut ingress_server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tracing::info!(
        bind = %bind_addr,
        path = %path,
        secured,
        inbound_queue = inbound_queue_capacity,
        "discord ingress listening (Ctrl+C to stop)"
    );

    loop {
        tokio::select! {
            maybe_event = inbound_rx.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                dispatch_ingress_event(&registry, event).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
            result = &mut ingress_server => {
                match result {
                    Ok(Ok(())) => tracing::warn!("discord ingress server exited"),
                    Ok(Err(error)) => tracing::error!("discord ingress server failed: {error}"),
                    Err(error) => tracing::error!("discord ingress task join error: {error}"),
                }
                break;
            }
        }
    }

    let _ = shutdown_tx.send(());
    registry.shutdown().await;
    Ok(())
}
