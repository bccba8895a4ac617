//! Mock transport for testing.
//!
//! Allows queueing responses and capturing composed requests for
//! verification. An empty response queue parks the call, mimicking a server
//! holding the long-poll open, which lets tests exercise interruption.

use super::{Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use slidesync_types::{SyncRequest, SyncResponse};

/// Mock transport for testing.
///
/// Clones share state, so a test can keep a handle while the engine owns
/// another.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportInner>>,
    response_queued: Arc<Notify>,
    request_recorded: Arc<Notify>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    responses: VecDeque<Result<SyncResponse, TransportError>>,
    requests: Vec<SyncRequest>,
    txn_counter: u64,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to be returned by an upcoming `sliding_sync` call.
    pub fn queue_response(&self, response: SyncResponse) {
        let mut inner = self.state.lock().unwrap();
        inner.responses.push_back(Ok(response));
        drop(inner);
        self.response_queued.notify_one();
    }

    /// Queue an error to be returned by an upcoming `sliding_sync` call.
    pub fn queue_error(&self, error: TransportError) {
        let mut inner = self.state.lock().unwrap();
        inner.responses.push_back(Err(error));
        drop(inner);
        self.response_queued.notify_one();
    }

    /// All requests issued so far, including interrupted ones.
    pub fn requests(&self) -> Vec<SyncRequest> {
        let inner = self.state.lock().unwrap();
        inner.requests.clone()
    }

    /// The most recently issued request.
    pub fn last_request(&self) -> Option<SyncRequest> {
        let inner = self.state.lock().unwrap();
        inner.requests.last().cloned()
    }

    /// Wait until at least `count` requests have been issued.
    pub async fn wait_for_requests(&self, count: usize) {
        loop {
            if self.state.lock().unwrap().requests.len() >= count {
                return;
            }
            self.request_recorded.notified().await;
        }
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            response_queued: Arc::clone(&self.response_queued),
            request_recorded: Arc::clone(&self.request_recorded),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn sliding_sync(
        &self,
        _url: &str,
        request: &SyncRequest,
    ) -> Result<SyncResponse, TransportError> {
        {
            let mut inner = self.state.lock().unwrap();
            inner.requests.push(request.clone());
        }
        self.request_recorded.notify_one();

        loop {
            {
                let mut inner = self.state.lock().unwrap();
                if let Some(response) = inner.responses.pop_front() {
                    return response;
                }
            }
            // Queue empty: the "server" holds the poll open.
            self.response_queued.notified().await;
        }
    }

    fn make_txn_id(&self) -> String {
        let mut inner = self.state.lock().unwrap();
        inner.txn_counter += 1;
        format!("txn-{}", inner.txn_counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SyncRequest {
        SyncRequest {
            lists: vec![],
            pos: None,
            timeout: 100,
            client_timeout: 10_100,
            room_subscriptions: Default::default(),
            unsubscribe_rooms: vec![],
            extensions: serde_json::Map::new(),
            txn_id: None,
        }
    }

    fn response(pos: &str) -> SyncResponse {
        SyncResponse {
            pos: pos.into(),
            txn_id: None,
            lists: vec![],
            rooms: Default::default(),
            extensions: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let transport = MockTransport::new();
        transport.queue_response(response("s1"));
        transport.queue_error(TransportError::Timeout);

        let first = transport.sliding_sync("url", &request()).await.unwrap();
        assert_eq!(first.pos, "s1");

        let second = transport.sliding_sync("url", &request()).await;
        assert_eq!(second, Err(TransportError::Timeout));
    }

    #[tokio::test]
    async fn records_requests_even_before_a_response_exists() {
        let transport = MockTransport::new();
        let poll = transport.clone();
        let task = tokio::spawn(async move { poll.sliding_sync("url", &request()).await });

        transport.wait_for_requests(1).await;
        assert_eq!(transport.requests().len(), 1);

        // Release the parked poll.
        transport.queue_response(response("s2"));
        let result = task.await.unwrap().unwrap();
        assert_eq!(result.pos, "s2");
    }

    #[tokio::test]
    async fn parked_poll_is_drop_safe() {
        let transport = MockTransport::new();
        {
            let poll = transport.clone();
            let task = tokio::spawn(async move { poll.sliding_sync("url", &request()).await });
            transport.wait_for_requests(1).await;
            task.abort();
        }
        // A later call still sees queued responses.
        transport.queue_response(response("s3"));
        let result = transport.sliding_sync("url", &request()).await.unwrap();
        assert_eq!(result.pos, "s3");
    }

    #[test]
    fn txn_ids_are_sequential_and_unique() {
        let transport = MockTransport::new();
        assert_eq!(transport.make_txn_id(), "txn-1");
        assert_eq!(transport.make_txn_id(), "txn-2");
        // Clones share the counter.
        assert_eq!(transport.clone().make_txn_id(), "txn-3");
    }
}
