//! Events emitted to engine subscribers.
//!
//! All three event families travel over one broadcast channel as a single
//! [`SyncUpdate`] enum, so subscribers observe the engine's contractual
//! per-response ordering directly:
//!
//! ```text
//! Lifecycle(RequestFinished) → Room × N → Lifecycle(Complete) → List × M
//! ```
//!
//! with at most one `List` per list index per response.

use std::collections::HashMap;

use slidesync_types::{RoomData, RoomId, SyncResponse};

use crate::transport::TransportError;

/// Where in a response's processing a lifecycle event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// The request finished: a response arrived or a transport error was
    /// classified. Carries the error in the failure case.
    RequestFinished,
    /// Room data for the response has been fully emitted.
    Complete,
}

/// Lifecycle progress for one request/response cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleUpdate {
    /// Which point in the cycle this marks.
    pub phase: LifecyclePhase,
    /// The response, when one was received.
    pub response: Option<SyncResponse>,
    /// The transport error, when the request failed.
    pub error: Option<TransportError>,
}

/// Data for a single room from a response.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomUpdate {
    /// The room the payload belongs to.
    pub room_id: RoomId,
    /// The payload, with absent state/timeline defaulted to empty.
    pub data: RoomData,
}

/// A list whose index map changed in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    /// Position of the list in the engine's list order.
    pub index: usize,
    /// Server-reported total joined count.
    pub joined_count: u64,
    /// Clone of the sparse index→room-id map after replay.
    pub room_index_to_room_id: HashMap<u64, RoomId>,
}

/// One event on the engine's broadcast channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncUpdate {
    /// Request/response lifecycle progress.
    Lifecycle(LifecycleUpdate),
    /// Per-room data.
    Room(RoomUpdate),
    /// Per-list index-map change.
    List(ListSnapshot),
}
