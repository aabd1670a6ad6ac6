//! Active sessions keyed by ticket channel, each served by its own worker task.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::channels::{InboundMessage, TicketOpened};
use crate::config::{AssistConfig, ConfigStore, PanelTable, PromptTable};
use crate::error::ConfigError;

use super::controller::SessionController;
use super::model::{RetireReason, SessionProfile};

const DEFAULT_SESSION_QUEUE_CAPACITY: usize = 32;

struct SessionHandle {
    ticket_id: String,
    generation: u64,
    tx: mpsc::Sender<InboundMessage>,
    cancel: CancellationToken,
    overflowed: CancellationToken,
    task: JoinHandle<()>,
}

type SessionMap = Arc<Mutex<HashMap<String, SessionHandle>>>;
type PluginDocuments = (Arc<AssistConfig>, Arc<PromptTable>, PanelTable);

/// Routes ticket events to per-session workers.
///
/// Messages for one ticket are handled in arrival order by a single worker,
/// so a session never runs two assistant round-trips at once. Tickets are
/// independent of each other: the welcome notice and thread creation run on
/// the ticket's worker, and messages posted meanwhile wait in its queue.
pub struct SessionRegistry {
    controller: Arc<SessionController>,
    store: Arc<dyn ConfigStore>,
    queue_capacity: usize,
    sessions: SessionMap,
    shutdown: CancellationToken,
    next_generation: AtomicU64,
}

impl SessionRegistry {
    pub fn new(controller: Arc<SessionController>, store: Arc<dyn ConfigStore>) -> Self {
        Self::with_queue_capacity(controller, store, DEFAULT_SESSION_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(
        controller: Arc<SessionController>,
        store: Arc<dyn ConfigStore>,
        queue_capacity: usize,
    ) -> Self {
        Self {
            controller,
            store,
            queue_capacity: queue_capacity.max(1),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            shutdown: CancellationToken::new(),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Start a session worker for `ticket` unless its channel already has one.
    ///
    /// Returns `true` when the ticket passed the enabled and panel checks and
    /// a worker was started. The worker posts the welcome notice and creates
    /// the thread before it consumes messages.
    pub async fn open_ticket(&self, ticket: TicketOpened) -> bool {
        if self.is_active(&ticket.channel_id).await {
            warn_duplicate_open(&ticket);
            return false;
        }

        let (config, prompts, panels) = match self.load_documents().await {
            Ok(documents) => documents,
            Err(error) => {
                tracing::error!(
                    ticket_id = %ticket.ticket_id,
                    error = %format!("{error:#}"),
                    "plugin configuration unavailable; ticket left to staff"
                );
                return false;
            }
        };
        let Some(profile) = self.controller.admit(&ticket, &config, &prompts, &panels) else {
            return false;
        };

        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&ticket.channel_id) {
            warn_duplicate_open(&ticket);
            return false;
        }
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let cancel = self.shutdown.child_token();
        let overflowed = CancellationToken::new();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let worker = SessionWorker {
            controller: Arc::clone(&self.controller),
            rx,
            cancel: cancel.clone(),
            overflowed: overflowed.clone(),
            sessions: Arc::clone(&self.sessions),
            generation,
        };
        let channel_id = ticket.channel_id.clone();
        let ticket_id = ticket.ticket_id.clone();
        let task = tokio::spawn(worker.run(ticket, profile));
        sessions.insert(
            channel_id,
            SessionHandle {
                ticket_id,
                generation,
                tx,
                cancel,
                overflowed,
                task,
            },
        );
        true
    }

    async fn load_documents(&self) -> anyhow::Result<PluginDocuments> {
        let store = Arc::clone(&self.store);
        let documents = tokio::task::spawn_blocking(move || -> Result<_, ConfigError> {
            Ok((store.assist_config()?, store.prompts()?, store.panels()?))
        })
        .await
        .context("plugin document loader stopped")??;
        Ok(documents)
    }

    /// Queue a channel message for the session of its ticket, if any.
    pub async fn route_message(&self, message: InboundMessage) {
        let sessions = self.sessions.lock().await;
        let Some(handle) = sessions.get(&message.channel_id) else {
            return;
        };
        match handle.tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(message)) => {
                tracing::warn!(
                    ticket_id = %handle.ticket_id,
                    message_id = %message.message_id,
                    capacity = self.queue_capacity,
                    "session queue full; handing ticket over to staff"
                );
                handle.overflowed.cancel();
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                tracing::debug!(
                    ticket_id = %handle.ticket_id,
                    message_id = %message.message_id,
                    "session worker already stopped"
                );
            }
        }
    }

    /// Retire the session for a closed or deleted ticket channel.
    pub async fn close_ticket(&self, channel_id: &str) -> bool {
        let Some(handle) = self.sessions.lock().await.remove(channel_id) else {
            return false;
        };
        handle.cancel.cancel();
        tracing::info!(
            ticket_id = %handle.ticket_id,
            channel_id,
            "ticket ended; assistant session cancelled"
        );
        true
    }

    /// Re-read plugin documents for sessions opened from now on.
    pub fn reload(&self) -> Result<(), ConfigError> {
        self.store.reload()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_active(&self, channel_id: &str) -> bool {
        self.sessions.lock().await.contains_key(channel_id)
    }

    /// Cancel every session and wait for the workers to stop.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handles: Vec<SessionHandle> = self
            .sessions
            .lock()
            .await
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        for handle in handles {
            if let Err(error) = handle.task.await {
                tracing::warn!(
                    ticket_id = %handle.ticket_id,
                    "session worker join error: {error}"
                );
            }
        }
    }
}

fn warn_duplicate_open(ticket: &TicketOpened) {
    tracing::warn!(
        ticket_id = %ticket.ticket_id,
        channel_id = %ticket.channel_id,
        "ticket channel already has an active session; ignoring duplicate open"
    );
}

struct SessionWorker {
    controller: Arc<SessionController>,
    rx: mpsc::Receiver<InboundMessage>,
    cancel: CancellationToken,
    overflowed: CancellationToken,
    sessions: SessionMap,
    generation: u64,
}

impl SessionWorker {
    async fn run(mut self, ticket: TicketOpened, profile: SessionProfile) {
        let started = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = self.controller.start(&ticket, profile) => match result {
                Ok(session) => Some(session),
                Err(error) => {
                    tracing::error!(
                        event = "ticket_assist.session.open_failed",
                        ticket_id = %ticket.ticket_id,
                        channel_id = %ticket.channel_id,
                        error = %format!("{error:#}"),
                        "failed to open assistant session"
                    );
                    None
                }
            },
        };
        let Some(mut session) = started else {
            self.release(&ticket.channel_id).await;
            return;
        };

        loop {
            let message = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    session.retire(RetireReason::TicketEnded);
                    break;
                }
                () = self.overflowed.cancelled() => {
                    self.controller
                        .abandon(&mut session, RetireReason::QueueOverflow)
                        .await;
                    break;
                }
                maybe_message = self.rx.recv() => match maybe_message {
                    Some(message) => message,
                    None => break,
                },
            };
            let outcome = self
                .controller
                .handle_message(&mut session, &message, &self.cancel)
                .await;
            tracing::debug!(
                ticket_id = %session.ticket_id(),
                message_id = %message.message_id,
                ?outcome,
                "session turn handled"
            );
            if session.is_retired() {
                break;
            }
        }

        self.release(session.channel_id()).await;
        tracing::info!(
            event = "ticket_assist.session.closed",
            ticket_id = %session.ticket_id(),
            state = ?session.state(),
            message_count = session.message_count(),
            "assistant session closed"
        );
    }

    /// Drop this worker's map entry unless a newer session replaced it.
    async fn release(&self, channel_id: &str) {
        let mut sessions = self.sessions.lock().await;
        if sessions
            .get(channel_id)
            .is_some_and(|handle| handle.generation == self.generation)
        {
            sessions.remove(channel_id);
        }
    }
}
