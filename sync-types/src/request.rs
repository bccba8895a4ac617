//! Request-side wire types for the sliding-sync long-poll.
//!
//! A request carries the per-list window fragments, the subscription diff,
//! the composed extension payloads, and the continuation position. Sticky
//! list fields are optional and omitted from the JSON whenever absent, so an
//! unmodified list serializes as a bare `{"ranges": [...]}` fragment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::WireError;
use crate::ids::{RangeSpec, RoomId};

/// Per-list request parameters.
///
/// `ranges` is the only non-sticky field: it changes on every scroll, so it
/// is always transmitted. Everything else is retained server-side and resent
/// only when changed; a ranges-only value is the unmodified-list fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// The index windows this client is tracking.
    pub ranges: Vec<RangeSpec>,
    /// Sort keys, in priority order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
    /// Server-side room filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ListFilters>,
    /// Maximum timeline events per room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_limit: Option<u64>,
    /// `[event_type, state_key]` pairs to include for each room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_state: Option<Vec<(String, String)>>,
    /// Ask the server for the entire list instead of windowed updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_get_all_rooms: Option<bool>,
}

impl ListParams {
    /// A fragment carrying only this params' ranges, used when the list is
    /// unmodified since its last successful transmission.
    pub fn ranges_only(&self) -> Self {
        Self {
            ranges: self.ranges.clone(),
            ..Self::default()
        }
    }
}

/// Server-side room filters for a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilters {
    /// Only direct-message rooms (or only non-DMs when false).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dm: Option<bool>,
    /// Only encrypted rooms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
    /// Only rooms the user is invited to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_invite: Option<bool>,
    /// Only tombstoned rooms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_tombstoned: Option<bool>,
    /// Case-insensitive room name substring match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_name_like: Option<String>,
    /// Only rooms of these types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_types: Option<Vec<String>>,
    /// Exclude rooms of these types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_room_types: Option<Vec<String>>,
    /// Only rooms inside these spaces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces: Option<Vec<String>>,
}

/// Parameters applied to every room subscription in a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSubscriptionParams {
    /// `[event_type, state_key]` pairs to include for the room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_state: Option<Vec<(String, String)>>,
    /// Maximum timeline events for the room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_limit: Option<u64>,
}

/// One sliding-sync long-poll request.
///
/// `pos`, `timeout` and `clientTimeout` are carried as query parameters by
/// HTTP transports; they live on this struct so a request is self-contained
/// for composition and testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Per-list fragments, positional.
    pub lists: Vec<ListParams>,
    /// Continuation position from the previous response; absent on the
    /// first request of the engine's lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    /// How long the server may hold the poll open, in milliseconds.
    pub timeout: u64,
    /// Client-side timeout in milliseconds; strictly greater than `timeout`
    /// so the server side always expires first.
    #[serde(rename = "clientTimeout")]
    pub client_timeout: u64,
    /// Newly desired subscriptions, each carrying the subscription params.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub room_subscriptions: BTreeMap<RoomId, RoomSubscriptionParams>,
    /// Subscriptions to drop.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsubscribe_rooms: Vec<RoomId>,
    /// Per-extension request payloads, keyed by extension name.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extensions: serde_json::Map<String, serde_json::Value>,
    /// Client transaction id to be echoed back by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
}

impl SyncRequest {
    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Serialization)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(WireError::Deserialization)
    }
}
