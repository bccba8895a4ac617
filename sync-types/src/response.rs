//! Response-side wire types for the sliding-sync long-poll.
//!
//! A response carries the new continuation position, positional list updates
//! expressed as operation sequences, per-room payloads, and per-extension
//! data. Room event payloads stay opaque `serde_json::Value`s; modeling them
//! belongs to the consumer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::WireError;
use crate::ids::{RangeSpec, RoomId};

/// One sliding-sync long-poll response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// New continuation position to pass back on the next request.
    pub pos: String,
    /// Echo of the most recent client transaction id the server saw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
    /// Positional updates, one entry per requested list.
    #[serde(default)]
    pub lists: Vec<ListResponse>,
    /// Per-room payloads, keyed by room id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rooms: BTreeMap<RoomId, RoomData>,
    /// Per-extension response payloads, keyed by extension name.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl SyncResponse {
    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Serialization)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(WireError::Deserialization)
    }
}

/// The server's update for a single list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Total joined rooms matching the list, not just the windowed part.
    pub count: u64,
    /// Operations to replay against the local index map, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ops: Vec<ListOp>,
}

/// A positional list-mutation operation, tagged by its `op` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum ListOp {
    /// Remove the mapping at `index`, opening a gap.
    #[serde(rename = "DELETE")]
    Delete {
        /// Absolute index to clear.
        index: u64,
    },
    /// Assign `room_id` at `index`, shifting occupants toward the most
    /// recent gap when the slot is taken.
    #[serde(rename = "INSERT")]
    Insert {
        /// Absolute index to fill.
        index: u64,
        /// Room to place at the index.
        room_id: RoomId,
    },
    /// Remove every mapping inside the inclusive range.
    #[serde(rename = "INVALIDATE")]
    Invalidate {
        /// Range of indices to drop.
        range: RangeSpec,
    },
    /// Assign `room_ids` positionally across the inclusive range.
    #[serde(rename = "SYNC")]
    Sync {
        /// Range of indices to fill.
        range: RangeSpec,
        /// Rooms for the range; may be shorter when the list ends early.
        room_ids: Vec<RoomId>,
    },
}

/// Per-room payload in a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    /// Calculated display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Requested state events, opaque to the engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_state: Vec<serde_json::Value>,
    /// Timeline events, opaque to the engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<serde_json::Value>,
    /// Unread notification count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_count: Option<u64>,
    /// Unread highlight count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_count: Option<u64>,
    /// Stripped state for invites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_state: Option<Vec<serde_json::Value>>,
    /// Whether this is the first payload for the room on this connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<bool>,
    /// Whether the timeline was truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limited: Option<bool>,
    /// Whether the room is a direct message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dm: Option<bool>,
    /// Pagination token for fetching earlier events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_batch: Option<String>,
}
