//! Assistant provider: wire types, backend seam, REST client, run polling.

mod backend;
mod client;
mod poll;
mod types;

pub use backend::AssistantBackend;
pub use client::{OPENAI_DEFAULT_API_BASE, OpenAiAssistantClient};
pub use poll::{
    DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RUN_TIMEOUT_SECS, RunPollPolicy,
    wait_for_run,
};
pub use types::{ContentBlock, MessageRole, Run, RunStatus, TextContent, Thread, ThreadMessage};
