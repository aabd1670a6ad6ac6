//! Waiting for an assistant run to reach a terminal status.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::AssistantError;

use super::backend::AssistantBackend;
use super::types::Run;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;

/// Fixed-interval poll, bounded by both a wall-clock timeout and an attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for RunPollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeout: Duration::from_secs(DEFAULT_RUN_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Poll `run` until it is terminal and return its final state.
///
/// Fails with [`AssistantError::Cancelled`] as soon as `cancel` fires, and
/// with `RunTimedOut` / `RunPollExhausted` when the policy bounds are hit.
pub async fn wait_for_run(
    backend: &dyn AssistantBackend,
    thread_id: &str,
    run: Run,
    policy: &RunPollPolicy,
    cancel: &CancellationToken,
) -> Result<Run, AssistantError> {
    let run_id = run.id.clone();
    let polling = poll_until_terminal(backend, thread_id, run, policy, cancel);
    match tokio::time::timeout(policy.timeout, polling).await {
        Ok(result) => result,
        Err(_) => Err(AssistantError::RunTimedOut {
            run_id,
            timeout_secs: policy.timeout.as_secs(),
        }),
    }
}

async fn poll_until_terminal(
    backend: &dyn AssistantBackend,
    thread_id: &str,
    mut run: Run,
    policy: &RunPollPolicy,
    cancel: &CancellationToken,
) -> Result<Run, AssistantError> {
    let mut attempts = 0_u32;
    while !run.status.is_terminal() {
        if attempts >= policy.max_attempts {
            return Err(AssistantError::RunPollExhausted {
                run_id: run.id,
                status: run.status.to_string(),
                attempts,
            });
        }
        tokio::select! {
            () = cancel.cancelled() => return Err(AssistantError::Cancelled),
            () = tokio::time::sleep(policy.interval) => {}
        }
        attempts += 1;
        run = backend.get_run(thread_id, &run.id).await?;
        tracing::debug!(
            run_id = %run.id,
            status = %run.status,
            attempt = attempts,
            "assistant run polled"
        );
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::assistant::types::{MessageRole, RunStatus, Thread, ThreadMessage};

    struct ScriptedRuns {
        statuses: Mutex<VecDeque<RunStatus>>,
        polls: AtomicU32,
    }

    impl ScriptedRuns {
        fn new(statuses: impl IntoIterator<Item = RunStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into_iter().collect()),
                polls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl AssistantBackend for ScriptedRuns {
        async fn create_thread(&self) -> Result<Thread, AssistantError> {
            Ok(Thread { id: "thread".to_string() })
        }

        async fn append_message(
            &self,
            _thread_id: &str,
            _role: MessageRole,
            _content: &str,
        ) -> Result<(), AssistantError> {
            Ok(())
        }

        async fn start_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run, AssistantError> {
            Ok(queued())
        }

        async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let status = self
                .statuses
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .pop_front()
                .unwrap_or(RunStatus::InProgress);
            Ok(Run {
                id: run_id.to_string(),
                status,
            })
        }

        async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>, AssistantError> {
            Ok(Vec::new())
        }
    }

    fn queued() -> Run {
        Run {
            id: "run_1".to_string(),
            status: RunStatus::Queued,
        }
    }

    fn policy(max_attempts: u32, timeout_secs: u64) -> RunPollPolicy {
        RunPollPolicy {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(timeout_secs),
            max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_terminal_status() {
        let backend = ScriptedRuns::new([RunStatus::InProgress, RunStatus::Completed]);
        let run = wait_for_run(&backend, "thread", queued(), &policy(10, 60), &CancellationToken::new())
            .await
            .unwrap_or_else(|err| panic!("run should complete: {err}"));
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(backend.polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn already_terminal_run_is_not_polled() {
        let backend = ScriptedRuns::new([]);
        let done = Run {
            id: "run_1".to_string(),
            status: RunStatus::Failed,
        };
        let run = wait_for_run(&backend, "thread", done, &policy(10, 60), &CancellationToken::new())
            .await
            .unwrap_or_else(|err| panic!("terminal run should return: {err}"));
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(backend.polls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let backend = ScriptedRuns::new([]);
        let result =
            wait_for_run(&backend, "thread", queued(), &policy(3, 600), &CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(AssistantError::RunPollExhausted { attempts: 3, .. })
        ));
        assert_eq!(backend.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_before_attempt_budget() {
        let backend = ScriptedRuns::new([]);
        let result =
            wait_for_run(&backend, "thread", queued(), &policy(1_000, 5), &CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(AssistantError::RunTimedOut { timeout_secs: 5, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_waiting() {
        let backend = ScriptedRuns::new([]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = wait_for_run(&backend, "thread", queued(), &policy(10, 60), &cancel).await;
        assert!(matches!(result, Err(AssistantError::Cancelled)));
        assert_eq!(backend.polls.load(Ordering::SeqCst), 0);
    }
}
