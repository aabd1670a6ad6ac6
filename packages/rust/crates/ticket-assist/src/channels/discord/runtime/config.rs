pub const DISCORD_DEFAULT_INGRESS_BIND: &str = "0.0.0.0:8082";
pub const DISCORD_DEFAULT_INGRESS_PATH: &str = "/discord/ingress";
pub const DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY: usize = 512;
pub const DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY: usize = 32;

/// Runtime configuration for the Discord ingress loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordRuntimeConfig {
    pub bind_addr: String,
    pub ingress_path: String,
    /// Shared secret expected in the ingress token header; `None` disables the check.
    pub secret_token: Option<String>,
    pub inbound_queue_capacity: usize,
    pub session_queue_capacity: usize,
}

impl Default for DiscordRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: DISCORD_DEFAULT_INGRESS_BIND.to_string(),
            ingress_path: DISCORD_DEFAULT_INGRESS_PATH.to_string(),
            secret_token: None,
            inbound_queue_capacity: DISCORD_DEFAULT_INBOUND_QUEUE_CAPACITY,
            session_queue_capacity: DISCORD_DEFAULT_SESSION_QUEUE_CAPACITY,
        }
    }
}
