//! Engine configuration.

use std::time::Duration;

/// Fixed margin added to the server poll timeout to produce the client-side
/// timeout, ensuring the client gives up strictly after the server would.
pub const CLIENT_TIMEOUT_BUFFER: Duration = Duration::from_secs(10);

/// Configuration for [`SyncEngine`](crate::SyncEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the sync proxy, handed to the transport on every request.
    pub proxy_url: String,
    /// How long the server may hold each long-poll open.
    pub poll_timeout: Duration,
    /// Delay before retrying after a failed request.
    pub retry_backoff: Duration,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl EngineConfig {
    /// Create a configuration with default timings for the given proxy URL.
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            poll_timeout: Duration::from_secs(30),
            retry_backoff: Duration::from_secs(3),
            event_capacity: 256,
        }
    }

    /// Set the server-side poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the retry backoff applied after failed requests.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Set the event channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}
