//! Ticket assistant: AI first response for support tickets.
//!
//! - A ticket opened on an assisted panel gets a welcome notice and an assistant thread.
//! - The ticket owner's messages are relayed to the assistant; replies are relayed back.
//! - Staff take over on the message limit, an escalation mention, a staff message, or a failure.

#![allow(missing_docs)]

mod assistant;
mod channels;
mod config;
mod error;
mod i18n;
mod session;

pub use assistant::{
    AssistantBackend, ContentBlock, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RUN_TIMEOUT_SECS, MessageRole, OPENAI_DEFAULT_API_BASE, OpenAiAssistantClient, Run,
    RunPollPolicy, RunStatus, TextContent, Thread, ThreadMessage, wait_for_run,
};
pub use channels::{
    Channel, DISCORD_DEFAULT_API_BASE, DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY,
    DISCORD_DEFAULT_INGRESS_BIND, DISCORD_DEFAULT_INGRESS_PATH,
    DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY, DISCORD_INGRESS_SECRET_HEADER,
    DISCORD_MAX_MESSAGE_LENGTH, DiscordChannel, DiscordIngressApp, DiscordRuntimeConfig,
    InboundMessage, IngressEvent, TicketOpened, build_discord_ingress_app, dispatch_ingress_event,
    parse_ingress_event, run_discord_ingress, split_message_for_discord,
};
pub use config::{
    AssistConfig, AssistantSettings, CONFIG_FILE_NAME, ConfigStore, DEFAULT_MAX_ASSISTANT_MESSAGES,
    DEFAULT_PROMPT_KEY, DiscordSettings, FileConfigStore, InMemoryConfigStore,
    PROMPTS_FILE_NAME, Panel, PanelTable, PluginSettings, PromptTable, RuntimeSettings,
    load_runtime_settings, load_runtime_settings_from_paths, role_mention, runtime_settings_paths,
};
pub use error::{AssistantError, ConfigError};
pub use i18n::{DEFAULT_LANGUAGE, MISSING_MESSAGE_FALLBACK, MessageKey, Translations};
pub use session::{
    LANGUAGE_INSTRUCTION, REPLY_PLACEHOLDER, RetireReason, Session, SessionController,
    SessionProfile, SessionRegistry, SessionState, TurnOutcome, extract_reply, mentions,
    strip_citations, turn_instruction,
};
