use anyhow::{Context, Result};
use serde_json::json;

use super::channel::DiscordChannel;
use super::constants::DISCORD_MAX_MESSAGE_LENGTH;

const ERROR_BODY_PREVIEW_CHARS: usize = 256;

impl DiscordChannel {
    pub(super) async fn send_text(&self, message: &str, recipient: &str) -> Result<()> {
        let channel_id = non_empty_channel_id(recipient)?;

        let chunks = split_message_for_discord(message, DISCORD_MAX_MESSAGE_LENGTH);
        if chunks.is_empty() {
            anyhow::bail!("discord message content cannot be empty");
        }

        for chunk in chunks {
            self.send_text_chunk(&chunk, channel_id).await?;
        }
        Ok(())
    }

    pub(super) async fn start_typing_indicator(&self, recipient: &str) -> Result<()> {
        let channel_id = non_empty_channel_id(recipient)?;
        let url = self.api_url(&format!("channels/{channel_id}/typing"));
        let response = self
            .client
            .post(url)
            .header("Authorization", self.authorization())
            .send()
            .await
            .context("discord typing request failed")?;
        ensure_success(response, "typing").await
    }

    async fn send_text_chunk(&self, content: &str, channel_id: &str) -> Result<()> {
        let url = self.api_url(&format!("channels/{channel_id}/messages"));
        let payload = json!({
            "content": content,
            "allowed_mentions": { "parse": ["roles", "users"] },
        });
        let response = self
            .client
            .post(url)
            .header("Authorization", self.authorization())
            .json(&payload)
            .send()
            .await
            .context("discord send request failed")?;
        ensure_success(response, "send").await
    }
}

fn non_empty_channel_id(recipient: &str) -> Result<&str> {
    let channel_id = recipient.trim();
    if channel_id.is_empty() {
        anyhow::bail!("discord recipient channel id cannot be empty");
    }
    Ok(channel_id)
}

async fn ensure_success(response: reqwest::Response, operation: &str) -> Result<()> {
    if response.status().is_success() {
        return Ok(());
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let preview = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect::<String>();
    anyhow::bail!("discord {operation} failed: status={status} body={preview}");
}

/// Split text into Discord-safe chunks using character count (UTF-8 safe).
///
/// Prefers breaking after the last newline of a full chunk so relayed
/// replies keep their paragraphs intact.
pub fn split_message_for_discord(message: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || message.is_empty() {
        return Vec::new();
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut remaining: Vec<char> = message.chars().collect();

    while remaining.len() > max_chars {
        let window = &remaining[..max_chars];
        let cut = window
            .iter()
            .rposition(|ch| *ch == '\n')
            .filter(|pos| *pos > 0)
            .map_or(max_chars, |pos| pos + 1);
        chunks.push(remaining[..cut].iter().collect());
        remaining.drain(..cut);
    }

    if !remaining.is_empty() {
        chunks.push(remaining.into_iter().collect());
    }
    chunks
}
