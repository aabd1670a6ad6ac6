//! Error types for configuration loading and the assistant provider.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading plugin JSON documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for its schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `prompts.json` has no `"default"` entry.
    #[error("prompt table {path} has no \"default\" entry")]
    MissingDefaultPrompt { path: PathBuf },
}

/// Failures talking to the assistant provider or waiting on a run.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The HTTP request never produced a response.
    #[error("assistant transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("assistant API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The provider answered with a body we could not decode.
    #[error("assistant response decode error ({context}): {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The run did not reach a terminal status within the configured timeout.
    #[error("assistant run {run_id} did not finish within {timeout_secs}s")]
    RunTimedOut { run_id: String, timeout_secs: u64 },

    /// The run did not reach a terminal status within the configured poll budget.
    #[error("assistant run {run_id} still {status} after {attempts} polls")]
    RunPollExhausted {
        run_id: String,
        status: String,
        attempts: u32,
    },

    /// The wait was cancelled because the ticket went away.
    #[error("assistant run wait cancelled")]
    Cancelled,
}
