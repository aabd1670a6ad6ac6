use async_trait::async_trait;

use crate::error::AssistantError;

use super::types::{MessageRole, Run, Thread, ThreadMessage};

/// Thread/run/message primitives of a hosted assistant.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    async fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AssistantError>;

    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// Thread messages, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError>;
}
