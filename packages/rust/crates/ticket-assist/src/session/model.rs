use std::fmt::{Display, Formatter};

use crate::channels::TicketOpened;
use crate::config::{AssistConfig, role_mention};

/// Why a session stopped relaying to the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    /// A staff member (other than the owner) spoke in the ticket.
    StaffJoined,
    /// The assistant produced `message_limit` replies.
    MessageLimit,
    /// The assistant mentioned the staff role.
    Escalated,
    /// The assistant run ended without completing.
    RunFailed,
    /// Transport or provider error during a round-trip.
    Error,
    /// The ticket was closed or its channel deleted.
    TicketEnded,
    /// Owner messages arrived faster than the session could answer them.
    QueueOverflow,
}

impl RetireReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StaffJoined => "staff_joined",
            Self::MessageLimit => "message_limit",
            Self::Escalated => "escalated",
            Self::RunFailed => "run_failed",
            Self::Error => "error",
            Self::TicketEnded => "ticket_ended",
            Self::QueueOverflow => "queue_overflow",
        }
    }
}

impl Display for RetireReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle after creation; creation itself is [`crate::SessionController::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Retired(RetireReason),
}

/// Deployment settings frozen for one session at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    pub language: String,
    pub assistant_id: String,
    pub staff_role_id: Option<String>,
    pub dev_role_id: Option<String>,
    pub message_limit: u32,
    pub system_prompt: String,
}

impl SessionProfile {
    pub fn from_config(config: &AssistConfig, system_prompt: &str) -> Self {
        Self {
            language: config.language().to_string(),
            assistant_id: config.assistant_key.clone(),
            staff_role_id: config.staff_role_id().map(ToString::to_string),
            dev_role_id: config.dev_role_id().map(ToString::to_string),
            message_limit: config.message_limit(),
            system_prompt: system_prompt.to_string(),
        }
    }
}

/// One assisted conversation, owned by the ticket's worker.
#[derive(Debug, Clone)]
pub struct Session {
    ticket_id: String,
    channel_id: String,
    owner_user_id: String,
    thread_id: String,
    state: SessionState,
    message_count: u32,
    profile: SessionProfile,
}

impl Session {
    pub fn new(ticket: &TicketOpened, thread_id: String, profile: SessionProfile) -> Self {
        Self {
            ticket_id: ticket.ticket_id.clone(),
            channel_id: ticket.channel_id.clone(),
            owner_user_id: ticket.owner_user_id.clone(),
            thread_id,
            state: SessionState::Active,
            message_count: 0,
            profile,
        }
    }

    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }

    /// Assistant-side conversation handle.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_retired(&self) -> bool {
        matches!(self.state, SessionState::Retired(_))
    }

    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    pub fn message_limit(&self) -> u32 {
        self.profile.message_limit
    }

    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }

    pub fn staff_mention(&self) -> Option<String> {
        self.profile.staff_role_id.as_deref().map(role_mention)
    }

    pub fn dev_mention(&self) -> Option<String> {
        self.profile.dev_role_id.as_deref().map(role_mention)
    }

    /// Count one completed assistant reply.
    pub(crate) fn record_reply(&mut self) -> u32 {
        self.message_count = self.message_count.saturating_add(1);
        self.message_count
    }

    pub fn limit_reached(&self) -> bool {
        self.message_count >= self.profile.message_limit
    }

    /// Move to `Retired`; returns `false` when the session was already retired.
    pub(crate) fn retire(&mut self, reason: RetireReason) -> bool {
        if self.is_retired() {
            return false;
        }
        self.state = SessionState::Retired(reason);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(limit: u32) -> Session {
        let ticket = TicketOpened {
            ticket_id: "t1".to_string(),
            option_id: "billing".to_string(),
            channel_id: "c1".to_string(),
            owner_user_id: "u1".to_string(),
        };
        let profile = SessionProfile {
            language: "en".to_string(),
            assistant_id: "asst".to_string(),
            staff_role_id: Some("staff".to_string()),
            dev_role_id: None,
            message_limit: limit,
            system_prompt: "be nice".to_string(),
        };
        Session::new(&ticket, "thread_1".to_string(), profile)
    }

    #[test]
    fn retire_is_one_way_and_keeps_first_reason() {
        let mut session = session(10);
        assert!(session.retire(RetireReason::StaffJoined));
        assert!(!session.retire(RetireReason::Error));
        assert_eq!(
            session.state(),
            SessionState::Retired(RetireReason::StaffJoined)
        );
    }

    #[test]
    fn limit_is_reached_on_the_counting_reply() {
        let mut session = session(2);
        session.record_reply();
        assert!(!session.limit_reached());
        session.record_reply();
        assert!(session.limit_reached());
    }

    #[test]
    fn mentions_use_role_syntax() {
        let session = session(1);
        assert_eq!(session.staff_mention().as_deref(), Some("<@&staff>"));
        assert_eq!(session.dev_mention(), None);
    }
}
