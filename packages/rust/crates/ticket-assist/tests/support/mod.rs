//! Scripted assistant backend and recording channel shared by session tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use ticket_assist::{
    AssistConfig, AssistantBackend, AssistantError, Channel, ContentBlock, InboundMessage,
    MessageRole, Panel, PanelTable, PromptTable, Run, RunPollPolicy, RunStatus,
    SessionController, Thread, ThreadMessage, TicketOpened, Translations,
};

pub const OWNER: &str = "owner-1";
pub const STAFF_ROLE: &str = "staff-role";
pub const DEV_ROLE: &str = "dev-role";
pub const CHANNEL: &str = "ticket-channel-1";
pub const OPTION: &str = "billing";

/// What the next started run does.
#[derive(Debug, Clone)]
pub enum ScriptedTurn {
    /// Completes; the newest assistant message carries this text.
    Reply(String),
    /// Ends in this terminal, non-completed status.
    Ends(RunStatus),
    /// Never leaves `in_progress`.
    Stuck,
    /// `start_run` fails with a provider error.
    StartFails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantCall {
    CreateThread,
    Append { role: MessageRole, content: String },
    StartRun { assistant_id: String },
    GetRun,
    ListMessages,
}

#[derive(Default)]
pub struct MockAssistant {
    calls: Mutex<Vec<AssistantCall>>,
    script: Mutex<VecDeque<ScriptedTurn>>,
    current: Mutex<Option<ScriptedTurn>>,
    threads: AtomicUsize,
    runs: AtomicUsize,
    fail_create_thread: AtomicBool,
}

impl MockAssistant {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, turn: ScriptedTurn) {
        lock(&self.script).push_back(turn);
    }

    pub fn push_reply(&self, text: &str) {
        self.push(ScriptedTurn::Reply(text.to_string()));
    }

    pub fn fail_thread_creation(&self) {
        self.fail_create_thread.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<AssistantCall> {
        lock(&self.calls).clone()
    }

    pub fn runs_started(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, AssistantCall::StartRun { .. }))
            .count()
    }

    fn record(&self, call: AssistantCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl AssistantBackend for MockAssistant {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        self.record(AssistantCall::CreateThread);
        if self.fail_create_thread.load(Ordering::SeqCst) {
            return Err(AssistantError::Api {
                status: 500,
                body: "thread creation failed".to_string(),
            });
        }
        let n = self.threads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Thread {
            id: format!("thread_{n}"),
        })
    }

    async fn append_message(
        &self,
        _thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AssistantError> {
        self.record(AssistantCall::Append {
            role,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn start_run(&self, _thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError> {
        self.record(AssistantCall::StartRun {
            assistant_id: assistant_id.to_string(),
        });
        let turn = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| ScriptedTurn::Reply("default reply".to_string()));
        if matches!(turn, ScriptedTurn::StartFails) {
            return Err(AssistantError::Api {
                status: 500,
                body: "run creation failed".to_string(),
            });
        }
        *lock(&self.current) = Some(turn);
        let n = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Run {
            id: format!("run_{n}"),
            status: RunStatus::Queued,
        })
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        self.record(AssistantCall::GetRun);
        let status = match lock(&self.current).as_ref() {
            Some(ScriptedTurn::Reply(_)) => RunStatus::Completed,
            Some(ScriptedTurn::Ends(status)) => *status,
            _ => RunStatus::InProgress,
        };
        Ok(Run {
            id: run_id.to_string(),
            status,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        self.record(AssistantCall::ListMessages);
        let text = match lock(&self.current).as_ref() {
            Some(ScriptedTurn::Reply(text)) => text.clone(),
            _ => String::new(),
        };
        Ok(vec![
            ThreadMessage {
                role: MessageRole::Assistant,
                content: vec![ContentBlock::text(text)],
            },
            ThreadMessage {
                role: MessageRole::User,
                content: vec![ContentBlock::text("earlier question")],
            },
        ])
    }
}

#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(String, String)>>,
    typing: AtomicUsize,
    fail_sends: AtomicBool,
    held_recipient: Mutex<Option<String>>,
    release: Notify,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    /// Message bodies in send order.
    pub fn sent(&self) -> Vec<String> {
        lock(&self.sent)
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn recipients(&self) -> Vec<String> {
        lock(&self.sent)
            .iter()
            .map(|(recipient, _)| recipient.clone())
            .collect()
    }

    pub fn typing_count(&self) -> usize {
        self.typing.load(Ordering::SeqCst)
    }

    /// Make sends to `recipient` wait until [`Self::release_held`].
    pub fn hold_sends_to(&self, recipient: &str) {
        *lock(&self.held_recipient) = Some(recipient.to_string());
    }

    pub fn release_held(&self) {
        lock(&self.held_recipient).take();
        self.release.notify_one();
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            anyhow::bail!("channel unavailable");
        }
        let held = lock(&self.held_recipient).as_deref() == Some(recipient);
        if held {
            self.release.notified().await;
        }
        lock(&self.sent).push((recipient.to_string(), message.to_string()));
        Ok(())
    }

    async fn start_typing(&self, _recipient: &str) -> anyhow::Result<()> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn fast_poll_policy() -> RunPollPolicy {
    RunPollPolicy {
        interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        max_attempts: 50,
    }
}

pub fn controller(
    assistant: &Arc<MockAssistant>,
    channel: &Arc<RecordingChannel>,
) -> SessionController {
    let assistant: Arc<dyn AssistantBackend> = assistant.clone();
    let channel: Arc<dyn Channel> = channel.clone();
    SessionController::new(
        assistant,
        channel,
        Arc::new(Translations::bundled()),
        fast_poll_policy(),
    )
}

pub fn assist_config(max_messages: u64) -> AssistConfig {
    serde_json::from_value(serde_json::json!({
        "apiKey": "sk-test",
        "assistantKey": "asst_test",
        "language": "en",
        "staffRoleId": STAFF_ROLE,
        "devRoleId": DEV_ROLE,
        "maxIAMessages": max_messages,
    }))
    .expect("valid assist config")
}

pub fn prompts() -> PromptTable {
    PromptTable::new(
        "You help with anything.".to_string(),
        [(OPTION.to_string(), "You help with billing.".to_string())],
    )
}

pub fn panels(enable_ia: bool) -> PanelTable {
    PanelTable::new(vec![Panel {
        options: vec![OPTION.to_string()],
        enable_ia,
    }])
}

pub fn ticket() -> TicketOpened {
    ticket_in(CHANNEL)
}

pub fn ticket_in(channel_id: &str) -> TicketOpened {
    TicketOpened {
        ticket_id: format!("ticket-{channel_id}"),
        option_id: OPTION.to_string(),
        channel_id: channel_id.to_string(),
        owner_user_id: OWNER.to_string(),
    }
}

pub fn owner_message(content: &str) -> InboundMessage {
    message_from(OWNER, &[], content)
}

pub fn message_from(author_id: &str, roles: &[&str], content: &str) -> InboundMessage {
    message_in(CHANNEL, author_id, roles, content)
}

pub fn message_in(
    channel_id: &str,
    author_id: &str,
    roles: &[&str],
    content: &str,
) -> InboundMessage {
    InboundMessage {
        message_id: format!("msg-{author_id}-{content}"),
        channel_id: channel_id.to_string(),
        author_id: author_id.to_string(),
        author_is_bot: false,
        member_roles: roles.iter().map(ToString::to_string).collect(),
        content: content.to_string(),
    }
}
