//! OpenAI Assistants (v2) client over REST.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AssistantError;

use super::backend::AssistantBackend;
use super::types::{MessageRole, Run, Thread, ThreadMessage};

/// Default provider endpoint.
pub const OPENAI_DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const ASSISTANTS_BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");
const ERROR_BODY_PREVIEW_CHARS: usize = 256;
const LIST_MESSAGES_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<ThreadMessage>,
}

/// HTTP client for the assistant provider.
pub struct OpenAiAssistantClient {
    client: reqwest::Client,
    api_base_url: String,
    api_key: String,
}

impl OpenAiAssistantClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, OPENAI_DEFAULT_API_BASE.to_string())
    }

    /// Client against a custom base URL (proxies, tests).
    pub fn new_with_base_url(api_key: String, api_base_url: String) -> Self {
        Self {
            client: build_assistant_http_client(),
            api_base_url,
            api_key,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        context: &'static str,
    ) -> Result<T, AssistantError> {
        let request = self.client.post(self.api_url(path)).json(&body);
        self.execute(request, context).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &'static str,
    ) -> Result<T, AssistantError> {
        let request = self.client.get(self.api_url(path));
        self.execute(request, context).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &'static str,
    ) -> Result<T, AssistantError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
            });
        }
        serde_json::from_str(&text).map_err(|source| AssistantError::Decode { context, source })
    }
}

fn build_assistant_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl AssistantBackend for OpenAiAssistantClient {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        self.post_json("threads", json!({}), "create thread").await
    }

    async fn append_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AssistantError> {
        let _: serde_json::Value = self
            .post_json(
                &format!("threads/{thread_id}/messages"),
                json!({ "role": role, "content": content }),
                "create message",
            )
            .await?;
        Ok(())
    }

    async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AssistantError> {
        self.post_json(
            &format!("threads/{thread_id}/runs"),
            json!({ "assistant_id": assistant_id }),
            "create run",
        )
        .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        self.get_json(&format!("threads/{thread_id}/runs/{run_id}"), "retrieve run")
            .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
        let list: MessageList = self
            .get_json(
                &format!("threads/{thread_id}/messages?order=desc&limit={LIST_MESSAGES_LIMIT}"),
                "list messages",
            )
            .await?;
        Ok(list.data)
    }
}
