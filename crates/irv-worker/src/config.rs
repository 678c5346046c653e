//! Worker configuration.

use std::time::Duration;

/// Configuration for a [`BackgroundService`](crate::BackgroundService).
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How long `init` waits for the ready signal.
    pub init_timeout: Duration,

    /// How long a call waits for its reply.
    pub call_timeout: Duration,

    /// Name given to the worker thread.
    pub thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(5),
            call_timeout: Duration::from_secs(30),
            thread_name: "irv-worker".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Short timeouts for tests and local tooling.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            init_timeout: Duration::from_millis(500),
            call_timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }

    /// Set the readiness timeout.
    #[must_use]
    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Set the per-call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the worker thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
