//! Transport abstraction for the sliding-sync long-poll.
//!
//! The engine issues one request at a time through a [`Transport`] and never
//! touches HTTP itself. Implementations are expected to hold the request
//! open for up to the request's `clientTimeout`; the engine cancels an
//! in-flight call by dropping its future, so implementations must be
//! drop-safe mid-poll.
//!
//! The transport also mints the opaque transaction identifiers the engine
//! attaches to requests, so id formats stay a transport concern.

mod mock;

pub use mock::MockTransport;

use async_trait::async_trait;
use thiserror::Error;

use slidesync_types::{SyncRequest, SyncResponse};

/// Transport errors.
///
/// Cancellation is not represented here: the engine interrupts a request by
/// dropping the future, and observes that as a structured interrupt rather
/// than an error value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with an HTTP error status.
    #[error("http status {status}: {message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The request failed before an HTTP status was obtained.
    #[error("network error: {0}")]
    Network(String),

    /// The client-side timeout elapsed.
    #[error("request timed out")]
    Timeout,
}

/// A long-poll transport to the sync proxy.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one sliding-sync request against `url` and await the response.
    ///
    /// May be held open by the server for up to the request's `timeout`.
    async fn sliding_sync(
        &self,
        url: &str,
        request: &SyncRequest,
    ) -> Result<SyncResponse, TransportError>;

    /// Mint a fresh opaque transaction identifier.
    fn make_txn_id(&self) -> String;
}
