//! # slidesync-types
//!
//! Wire-format types for the slidesync sliding-sync protocol.
//!
//! This crate provides the JSON request/response model shared by the other
//! slidesync crates:
//! - [`RoomId`], [`RangeSpec`] - opaque room ids and inclusive index windows
//! - [`SyncRequest`], [`ListParams`] - the long-poll request body
//! - [`SyncResponse`], [`ListOp`], [`RoomData`] - the long-poll response
//! - [`WireError`] - encode/decode errors

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod request;
mod response;

pub use error::WireError;
pub use ids::{RangeSpec, RoomId};
pub use request::{ListFilters, ListParams, RoomSubscriptionParams, SyncRequest};
pub use response::{ListOp, ListResponse, RoomData, SyncResponse};
