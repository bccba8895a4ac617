//! Identity and window types for slidesync.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque room identifier.
///
/// The engine never inspects the contents; rooms are modeled entirely by the
/// consumer. Serializes as a plain JSON string so it can key subscription
/// maps on the wire.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a RoomId from any string-ish value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoomId({})", self.0)
    }
}

/// An inclusive `[lo, hi]` index window over the server-side room list.
///
/// Serializes as a two-element JSON array, matching the wire format of the
/// `ranges` request field and the `range` operation payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeSpec(pub u64, pub u64);

impl RangeSpec {
    /// Create a new inclusive range.
    pub fn new(lo: u64, hi: u64) -> Self {
        Self(lo, hi)
    }

    /// The lower bound (inclusive).
    pub fn start(&self) -> u64 {
        self.0
    }

    /// The upper bound (inclusive).
    pub fn end(&self) -> u64 {
        self.1
    }

    /// Whether `index` falls inside this range.
    pub fn contains(&self, index: u64) -> bool {
        self.0 <= index && index <= self.1
    }
}

impl fmt::Debug for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}
