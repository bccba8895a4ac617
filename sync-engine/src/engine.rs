//! The sliding-sync driver loop.
//!
//! [`SyncEngine`] maintains windowed views of the server-side room list by
//! re-issuing a single long-poll request forever. External mutators (ranges,
//! list params, subscriptions) interrupt the in-flight poll so the next
//! request reflects the change, and each mutation's fate is observable
//! through a transaction handle.
//!
//! # Interruption
//!
//! Rather than cancelling through the transport, the loop races the request
//! future against a per-iteration interrupt in a biased `select!`. The bias
//! toward the response matters: when a response completes in the same wakeup
//! as an interrupt, the response is processed and the raced mutation is
//! caught by the list-modified counter instead of being lost.
//!
//! # Shared state
//!
//! All mutable state lives behind one `std::sync::Mutex` that is never held
//! across an await. Public mutators are synchronous and ordered against the
//! loop by that lock.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, Notify};

use slidesync_core::{apply_list_response, ListData, SlidingList, SubscriptionDiff, SubscriptionSet};
use slidesync_types::{
    ListParams, RangeSpec, RoomId, RoomSubscriptionParams, SyncRequest, SyncResponse,
};

use crate::config::{EngineConfig, CLIENT_TIMEOUT_BUFFER};
use crate::error::EngineError;
use crate::events::{LifecyclePhase, LifecycleUpdate, ListSnapshot, RoomUpdate, SyncUpdate};
use crate::extensions::{Extension, ExtensionPhase, ExtensionRegistry};
use crate::transport::{Transport, TransportError};
use crate::txn::{TransactionLedger, TxnHandle};

/// The sliding-sync client engine.
///
/// Share via `Arc`: `start` runs the loop on one task while other tasks call
/// the mutators.
pub struct SyncEngine<T: Transport> {
    config: EngineConfig,
    transport: T,
    state: Mutex<EngineState>,
    events: broadcast::Sender<SyncUpdate>,
}

struct EngineState {
    lists: Vec<SlidingList>,
    pos: Option<String>,
    subs: SubscriptionSet,
    subscription_params: RoomSubscriptionParams,
    extensions: ExtensionRegistry,
    ledger: TransactionLedger,
    /// Txn id to attach to the next composed request.
    pending_txn: Option<String>,
    /// Bumped by every `set_list`; a response whose in-flight snapshot
    /// differs must not replay list ops.
    list_modified_count: u64,
    terminated: bool,
    running: bool,
    /// Interrupt for the current loop iteration, installed at composition
    /// time. Notifying it aborts the in-flight poll.
    interrupt: Option<Arc<Notify>>,
}

/// Everything captured at request-composition time that response processing
/// needs back.
struct ComposedRequest {
    request: SyncRequest,
    diff: SubscriptionDiff,
    list_modified_snapshot: u64,
}

impl<T: Transport> SyncEngine<T> {
    /// Create an engine over `transport` with an initial set of lists.
    pub fn new(config: EngineConfig, transport: T, lists: Vec<ListParams>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            config,
            transport,
            state: Mutex::new(EngineState {
                lists: lists.into_iter().map(SlidingList::new).collect(),
                pos: None,
                subs: SubscriptionSet::new(),
                subscription_params: RoomSubscriptionParams::default(),
                extensions: ExtensionRegistry::new(),
                ledger: TransactionLedger::new(),
                pending_txn: None,
                list_modified_count: 0,
                terminated: false,
                running: false,
                interrupt: None,
            }),
            events,
        }
    }

    /// Subscribe to the engine's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncUpdate> {
        self.events.subscribe()
    }

    /// Number of lists.
    pub fn list_length(&self) -> usize {
        self.state.lock().unwrap().lists.len()
    }

    /// Full clone of a list's request parameters, or `None` when out of
    /// range.
    pub fn get_list(&self, index: usize) -> Option<ListParams> {
        let state = self.state.lock().unwrap();
        state.lists.get(index).map(|list| list.params().clone())
    }

    /// Clone of a list's derived state (joined count and index map), or
    /// `None` when out of range.
    pub fn get_list_data(&self, index: usize) -> Option<ListData> {
        let state = self.state.lock().unwrap();
        state.lists.get(index).map(|list| list.data())
    }

    /// Replace the list at `index`, or append a new list at exactly
    /// `index == len`. Marks the list modified and interrupts the in-flight
    /// poll; the returned handle tracks the triggered transaction.
    pub fn set_list(&self, index: usize, params: ListParams) -> Result<TxnHandle, EngineError> {
        let mut state = self.state.lock().unwrap();
        let len = state.lists.len();
        if index < len {
            state.lists[index].replace(params);
        } else if index == len {
            state.lists.push(SlidingList::new(params));
        } else {
            return Err(EngineError::IndexOutOfBounds { index, len });
        }
        state.list_modified_count += 1;
        Ok(self.resend_locked(&mut state))
    }

    /// Update only the ranges of the list at `index`. Sticky parameters are
    /// untouched and not retransmitted.
    pub fn set_list_ranges(
        &self,
        index: usize,
        ranges: Vec<RangeSpec>,
    ) -> Result<TxnHandle, EngineError> {
        let mut state = self.state.lock().unwrap();
        let len = state.lists.len();
        let Some(list) = state.lists.get_mut(index) else {
            return Err(EngineError::IndexOutOfBounds { index, len });
        };
        list.update_ranges(ranges);
        Ok(self.resend_locked(&mut state))
    }

    /// Clone of the desired room-subscription set.
    pub fn get_room_subscriptions(&self) -> BTreeSet<RoomId> {
        self.state.lock().unwrap().subs.desired()
    }

    /// Replace the desired room-subscription set; the next request carries
    /// the diff against what the server already knows.
    pub fn modify_room_subscriptions(&self, desired: BTreeSet<RoomId>) -> TxnHandle {
        let mut state = self.state.lock().unwrap();
        state.subs.replace_desired(desired);
        self.resend_locked(&mut state)
    }

    /// Replace the params template applied to room subscriptions. Forgets
    /// all confirmed subscriptions so every desired room is re-sent with the
    /// new params.
    pub fn modify_room_subscription_info(&self, params: RoomSubscriptionParams) -> TxnHandle {
        let mut state = self.state.lock().unwrap();
        state.subscription_params = params;
        state.subs.clear_confirmed();
        self.resend_locked(&mut state)
    }

    /// Register a named extension. Fails on duplicate names.
    pub fn register_extension(&self, extension: Box<dyn Extension>) -> Result<(), EngineError> {
        self.state.lock().unwrap().extensions.register(extension)
    }

    /// Interrupt the in-flight poll and issue a fresh transaction.
    ///
    /// The handle resolves once a response acknowledges the transaction.
    /// When several calls collapse into one round trip, only the most recent
    /// id rides the request; the others reject with their own ids.
    pub fn resend(&self) -> TxnHandle {
        let mut state = self.state.lock().unwrap();
        self.resend_locked(&mut state)
    }

    fn resend_locked(&self, state: &mut EngineState) -> TxnHandle {
        let txn_id = self.transport.make_txn_id();
        let handle = state.ledger.issue(txn_id.clone());
        state.pending_txn = Some(txn_id);
        // The permit persists if the loop is not currently parked on this
        // iteration's interrupt; mutations made before the next composition
        // are picked up there without a wasted abort.
        if let Some(interrupt) = &state.interrupt {
            interrupt.notify_one();
        }
        handle
    }

    /// Terminate the loop and interrupt the in-flight poll. Pending
    /// transaction handles observe `EngineStopped`; no further events are
    /// emitted once the loop exits.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.terminated = true;
        state.ledger.clear();
        if let Some(interrupt) = &state.interrupt {
            interrupt.notify_one();
        }
    }

    /// Run the main loop. Completes only after [`stop`](Self::stop) is
    /// observed; a second concurrent call returns immediately.
    pub async fn start(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.running {
                tracing::warn!("sync loop already running, ignoring start");
                return;
            }
            state.running = true;
        }

        self.run_loop().await;

        let mut state = self.state.lock().unwrap();
        state.interrupt = None;
        state.running = false;
    }

    async fn run_loop(&self) {
        loop {
            let interrupt = Arc::new(Notify::new());
            let composed = {
                let mut state = self.state.lock().unwrap();
                if state.terminated {
                    break;
                }
                state.interrupt = Some(Arc::clone(&interrupt));
                self.compose_request(&mut state)
            };

            let outcome = {
                let request_fut = self
                    .transport
                    .sliding_sync(&self.config.proxy_url, &composed.request);
                tokio::pin!(request_fut);
                tokio::select! {
                    biased;
                    result = &mut request_fut => Some(result),
                    _ = interrupt.notified() => None,
                }
            };

            match outcome {
                // Interrupted by resend() or stop(): no backoff, no failure
                // emission; the next iteration reflects the mutation.
                None => {
                    if self.state.lock().unwrap().terminated {
                        break;
                    }
                    tracing::debug!("long-poll interrupted, recomposing request");
                }
                Some(Ok(response)) => {
                    let mut state = self.state.lock().unwrap();
                    self.process_response(&mut state, response, &composed);
                }
                Some(Err(error)) => {
                    tracing::warn!("sliding sync request failed: {}", error);
                    if matches!(error, TransportError::Http { .. }) {
                        self.emit(SyncUpdate::Lifecycle(LifecycleUpdate {
                            phase: LifecyclePhase::RequestFinished,
                            response: None,
                            error: Some(error),
                        }));
                    }
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
            }
        }
    }

    fn compose_request(&self, state: &mut EngineState) -> ComposedRequest {
        let list_modified_snapshot = state.list_modified_count;

        let is_initial = state.pos.is_none();
        let extensions = state.extensions.compose(is_initial);

        let diff = state.subs.diff();
        let room_subscriptions = diff
            .added
            .iter()
            .map(|room_id| (room_id.clone(), state.subscription_params.clone()))
            .collect();

        let timeout = self.config.poll_timeout.as_millis() as u64;
        let request = SyncRequest {
            lists: state.lists.iter().map(|list| list.snapshot(false)).collect(),
            pos: state.pos.clone(),
            timeout,
            client_timeout: timeout + CLIENT_TIMEOUT_BUFFER.as_millis() as u64,
            room_subscriptions,
            unsubscribe_rooms: diff.removed.clone(),
            extensions,
            txn_id: state.pending_txn.take(),
        };

        ComposedRequest {
            request,
            diff,
            list_modified_snapshot,
        }
    }

    fn process_response(
        &self,
        state: &mut EngineState,
        response: SyncResponse,
        composed: &ComposedRequest,
    ) {
        state.pos = Some(response.pos.clone());
        state.subs.commit(&composed.diff);

        // Lists reshaped while the request was in flight: the response's
        // positional ops no longer line up with the current lists. Rooms are
        // still processed; op replay is skipped for this response.
        let lists_stale = state.list_modified_count != composed.list_modified_snapshot;
        if lists_stale {
            tracing::debug!("lists changed mid-flight, skipping op replay for this response");
        }

        for list in &mut state.lists {
            list.clear_modified();
        }
        for (index, list_response) in response.lists.iter().enumerate() {
            if let Some(list) = state.lists.get_mut(index) {
                list.set_joined_count(list_response.count);
            }
        }

        self.emit(SyncUpdate::Lifecycle(LifecycleUpdate {
            phase: LifecyclePhase::RequestFinished,
            response: Some(response.clone()),
            error: None,
        }));

        state
            .extensions
            .dispatch(ExtensionPhase::PreProcess, &response.extensions);

        for (room_id, data) in &response.rooms {
            self.emit(SyncUpdate::Room(RoomUpdate {
                room_id: room_id.clone(),
                data: data.clone(),
            }));
        }

        let mut replayed = Vec::new();
        if !lists_stale {
            for (index, list_response) in response.lists.iter().enumerate() {
                if let Some(list) = state.lists.get_mut(index) {
                    apply_list_response(list, list_response);
                    if !list_response.ops.is_empty() {
                        replayed.push(index);
                    }
                }
            }
        }

        self.emit(SyncUpdate::Lifecycle(LifecycleUpdate {
            phase: LifecyclePhase::Complete,
            response: Some(response.clone()),
            error: None,
        }));

        state
            .extensions
            .dispatch(ExtensionPhase::PostProcess, &response.extensions);

        for index in replayed {
            let list = &state.lists[index];
            self.emit(SyncUpdate::List(ListSnapshot {
                index,
                joined_count: list.joined_count(),
                room_index_to_room_id: list.data().room_index_to_room_id,
            }));
        }

        if let Some(txn_id) = response.txn_id.as_deref() {
            state.ledger.acknowledge(txn_id);
        }
    }

    fn emit(&self, update: SyncUpdate) {
        // No receivers is fine; events are fire-and-forget.
        let _ = self.events.send(update);
    }
}
