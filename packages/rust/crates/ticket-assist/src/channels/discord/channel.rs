//! Discord REST channel: ticket notices, relayed replies, typing indicator.

use std::time::Duration;

use async_trait::async_trait;

use crate::channels::traits::Channel;

use super::constants::DISCORD_DEFAULT_API_BASE;

const DISCORD_CONNECT_TIMEOUT_SECS: u64 = 5;
const DISCORD_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Outbound Discord channel authenticated as a bot.
pub struct DiscordChannel {
    pub(super) bot_token: String,
    api_base_url: String,
    pub(super) client: reqwest::Client,
}

impl DiscordChannel {
    pub fn new(bot_token: String) -> Self {
        Self::new_with_base_url(bot_token, DISCORD_DEFAULT_API_BASE.to_string())
    }

    /// Create a Discord channel with custom API base URL (useful for tests/proxies).
    pub fn new_with_base_url(bot_token: String, api_base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DISCORD_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DISCORD_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            bot_token,
            api_base_url,
            client,
        }
    }

    pub(super) fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(super) fn authorization(&self) -> String {
        format!("Bot {}", self.bot_token)
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send(&self, message: &str, recipient: &str) -> anyhow::Result<()> {
        self.send_text(message, recipient).await
    }

    async fn start_typing(&self, recipient: &str) -> anyhow::Result<()> {
        self.start_typing_indicator(recipient).await
    }
}
