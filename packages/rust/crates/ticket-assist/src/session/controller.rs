//! Per-ticket conversation rules: session opening, owner turns, staff hand-off.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::assistant::{AssistantBackend, MessageRole, RunPollPolicy, RunStatus, wait_for_run};
use crate::channels::{Channel, InboundMessage, TicketOpened};
use crate::config::{AssistConfig, PanelTable, PromptTable};
use crate::error::AssistantError;
use crate::i18n::{MessageKey, Translations};

use super::model::{RetireReason, Session, SessionProfile};
use super::reply::{extract_reply, mentions, turn_instruction};

const LOG_PREVIEW_LEN: usize = 80;

/// What a single inbound message did to its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Bot author, non-owner non-staff author, or already retired.
    Ignored,
    /// Staff spoke; the session retired without a notice.
    StaffTookOver,
    /// The assistant reply was relayed and the session stays active.
    Replied,
    /// Hand-off notice posted after the limit or an escalation mention.
    Transferred(RetireReason),
    /// The run ended in a non-completed status.
    Failed(RunStatus),
    /// Transport or provider error; the error notice was attempted.
    Errored,
    /// The ticket ended while the run was in flight.
    Cancelled,
}

enum RoundTrip {
    Completed(String),
    Unsuccessful(RunStatus),
}

/// Drives sessions against an assistant backend and a chat channel.
pub struct SessionController {
    assistant: Arc<dyn AssistantBackend>,
    channel: Arc<dyn Channel>,
    translations: Arc<Translations>,
    poll_policy: RunPollPolicy,
}

impl SessionController {
    pub fn new(
        assistant: Arc<dyn AssistantBackend>,
        channel: Arc<dyn Channel>,
        translations: Arc<Translations>,
        poll_policy: RunPollPolicy,
    ) -> Self {
        Self {
            assistant,
            channel,
            translations,
            poll_policy,
        }
    }

    pub fn poll_policy(&self) -> &RunPollPolicy {
        &self.poll_policy
    }

    /// Start assistance for a newly opened ticket.
    ///
    /// Returns `Ok(None)` when assistance is disabled globally or for the
    /// ticket's panel. The welcome notice is posted before the assistant
    /// thread is created; failure of either yields an error and no session.
    pub async fn open(
        &self,
        ticket: &TicketOpened,
        config: &AssistConfig,
        prompts: &PromptTable,
        panels: &PanelTable,
    ) -> anyhow::Result<Option<Session>> {
        match self.admit(ticket, config, prompts, panels) {
            Some(profile) => self.start(ticket, profile).await.map(Some),
            None => Ok(None),
        }
    }

    /// Gate a ticket on the global flag and its panel, and freeze the
    /// session profile. Does no I/O.
    pub fn admit(
        &self,
        ticket: &TicketOpened,
        config: &AssistConfig,
        prompts: &PromptTable,
        panels: &PanelTable,
    ) -> Option<SessionProfile> {
        if !config.enabled {
            tracing::debug!(
                ticket_id = %ticket.ticket_id,
                "assistance disabled in plugin config; ticket left to staff"
            );
            return None;
        }
        if !panels.assistance_enabled_for(&ticket.option_id) {
            tracing::info!(
                ticket_id = %ticket.ticket_id,
                option_id = %ticket.option_id,
                "assistance disabled for this panel"
            );
            return None;
        }
        Some(SessionProfile::from_config(
            config,
            prompts.resolve(&ticket.option_id),
        ))
    }

    /// Post the welcome notice and create the assistant thread.
    pub async fn start(
        &self,
        ticket: &TicketOpened,
        profile: SessionProfile,
    ) -> anyhow::Result<Session> {
        let welcome = self
            .translations
            .resolve(&profile.language, MessageKey::Welcome, &[]);
        self.channel
            .send(&welcome, &ticket.channel_id)
            .await
            .context("failed to post welcome notice")?;
        let thread = self
            .assistant
            .create_thread()
            .await
            .context("failed to create assistant thread")?;

        tracing::info!(
            event = "ticket_assist.session.opened",
            ticket_id = %ticket.ticket_id,
            channel_id = %ticket.channel_id,
            option_id = %ticket.option_id,
            thread_id = %thread.id,
            language = %profile.language,
            message_limit = profile.message_limit,
            "assistant session opened"
        );
        Ok(Session::new(ticket, thread.id, profile))
    }

    /// Retire an active session with `reason` and post the error notice.
    pub async fn abandon(&self, session: &mut Session, reason: RetireReason) {
        if !session.retire(reason) {
            return;
        }
        tracing::warn!(
            event = "ticket_assist.session.retired",
            ticket_id = %session.ticket_id(),
            reason = %reason,
            "assistant session abandoned"
        );
        self.notify(session, MessageKey::Error).await;
    }

    /// Apply one channel message to `session`.
    ///
    /// `cancel` aborts an in-flight run poll; the session then retires with
    /// [`RetireReason::TicketEnded`] and nothing is posted.
    pub async fn handle_message(
        &self,
        session: &mut Session,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> TurnOutcome {
        if session.is_retired() || message.author_is_bot {
            return TurnOutcome::Ignored;
        }

        let from_owner = message.author_id == session.owner_user_id();
        if !from_owner {
            let is_staff = session
                .profile()
                .staff_role_id
                .as_deref()
                .is_some_and(|role_id| message.has_role(role_id));
            if !is_staff {
                return TurnOutcome::Ignored;
            }
            session.retire(RetireReason::StaffJoined);
            tracing::info!(
                event = "ticket_assist.session.retired",
                ticket_id = %session.ticket_id(),
                staff_user_id = %message.author_id,
                reason = %RetireReason::StaffJoined,
                "staff joined the ticket; assistant stands down"
            );
            return TurnOutcome::StaffTookOver;
        }

        tracing::info!(
            r#"ticket {ticket} ← owner: "{preview}""#,
            ticket = session.ticket_id(),
            preview = log_preview(&message.content)
        );

        if let Err(error) = self.channel.start_typing(session.channel_id()).await {
            tracing::debug!("failed to start typing indicator: {error}");
        }

        match self.round_trip(session, &message.content, cancel).await {
            Ok(RoundTrip::Completed(reply)) => self.relay_reply(session, reply).await,
            Ok(RoundTrip::Unsuccessful(status)) => {
                session.retire(RetireReason::RunFailed);
                tracing::warn!(
                    event = "ticket_assist.run.unsuccessful",
                    ticket_id = %session.ticket_id(),
                    thread_id = %session.thread_id(),
                    status = %status,
                    "assistant run did not complete"
                );
                self.notify(session, MessageKey::Failure).await;
                TurnOutcome::Failed(status)
            }
            Err(AssistantError::Cancelled) => {
                session.retire(RetireReason::TicketEnded);
                tracing::info!(
                    ticket_id = %session.ticket_id(),
                    "ticket ended during assistant run"
                );
                TurnOutcome::Cancelled
            }
            Err(error) => {
                session.retire(RetireReason::Error);
                tracing::error!(
                    event = "ticket_assist.run.error",
                    ticket_id = %session.ticket_id(),
                    thread_id = %session.thread_id(),
                    error = %error,
                    "assistant round-trip failed"
                );
                self.notify(session, MessageKey::Error).await;
                TurnOutcome::Errored
            }
        }
    }

    async fn round_trip(
        &self,
        session: &Session,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<RoundTrip, AssistantError> {
        let thread_id = session.thread_id();
        let instruction = turn_instruction(&session.profile().system_prompt);
        self.assistant
            .append_message(thread_id, MessageRole::Assistant, &instruction)
            .await?;
        self.assistant
            .append_message(thread_id, MessageRole::User, content)
            .await?;
        let run = self
            .assistant
            .start_run(thread_id, &session.profile().assistant_id)
            .await?;
        let run = wait_for_run(
            self.assistant.as_ref(),
            thread_id,
            run,
            &self.poll_policy,
            cancel,
        )
        .await?;
        if run.status != RunStatus::Completed {
            return Ok(RoundTrip::Unsuccessful(run.status));
        }
        let messages = self.assistant.list_messages(thread_id).await?;
        Ok(RoundTrip::Completed(extract_reply(&messages)))
    }

    async fn relay_reply(&self, session: &mut Session, reply: String) -> TurnOutcome {
        let count = session.record_reply();

        let hand_off = if session.limit_reached() {
            Some(RetireReason::MessageLimit)
        } else if session
            .staff_mention()
            .is_some_and(|mention| mentions(&reply, &mention))
        {
            Some(RetireReason::Escalated)
        } else {
            None
        };

        if let Some(reason) = hand_off {
            session.retire(reason);
            tracing::info!(
                event = "ticket_assist.session.retired",
                ticket_id = %session.ticket_id(),
                message_count = count,
                reason = %reason,
                "handing ticket over to staff"
            );
            self.notify(session, MessageKey::Transferred).await;
            return TurnOutcome::Transferred(reason);
        }

        match self.channel.send(&reply, session.channel_id()).await {
            Ok(()) => {
                tracing::info!(
                    r#"ticket {ticket} → assistant ({count}/{limit}): "{preview}""#,
                    ticket = session.ticket_id(),
                    limit = session.message_limit(),
                    preview = log_preview(&reply)
                );
                TurnOutcome::Replied
            }
            Err(error) => {
                session.retire(RetireReason::Error);
                tracing::error!(
                    event = "ticket_assist.reply.send_failed",
                    ticket_id = %session.ticket_id(),
                    error = %format!("{error:#}"),
                    "failed to relay assistant reply"
                );
                self.notify(session, MessageKey::Error).await;
                TurnOutcome::Errored
            }
        }
    }

    /// Post a localized notice; delivery failures are logged only.
    async fn notify(&self, session: &Session, key: MessageKey) {
        let (name, mention) = match key {
            MessageKey::Transferred => ("staffRole", session.staff_mention()),
            MessageKey::Failure | MessageKey::Error => ("adminRole", session.dev_mention()),
            MessageKey::Welcome => ("", None),
        };
        let mention = mention.unwrap_or_default();
        let text = self.translations.resolve(
            &session.profile().language,
            key,
            &[(name, mention.as_str())],
        );
        if let Err(error) = self.channel.send(&text, session.channel_id()).await {
            tracing::warn!(
                ticket_id = %session.ticket_id(),
                notice = %key,
                error = %format!("{error:#}"),
                "failed to post ticket notice"
            );
        }
    }
}

fn log_preview(s: &str) -> String {
    let one_line: String = s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();
    if one_line.chars().count() > LOG_PREVIEW_LEN {
        format!(
            "{}...",
            one_line.chars().take(LOG_PREVIEW_LEN).collect::<String>()
        )
    } else {
        one_line
    }
}
