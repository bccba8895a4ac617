//! # slidesync-core
//!
//! Pure logic for the slidesync engine (no I/O, instant tests).
//!
//! This crate implements the windowed room-list state and the algorithms
//! that maintain it, without any network or async machinery:
//!
//! - [`SlidingList`] - per-list parameters, sparse index→room-id map, and
//!   the sticky-parameter transmission model
//! - [`apply_list_response`] - replay of positional `DELETE | INSERT |
//!   INVALIDATE | SYNC` operations into a list
//! - [`SubscriptionSet`] - desired vs confirmed room-subscription diffing
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce
//! output without side effects. The long-poll driving, interruption and
//! event emission live in `slidesync-engine`, which owns these values and
//! decides when each algorithm runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod list;
pub mod replay;
pub mod subs;

pub use list::{ListData, SlidingList};
pub use replay::apply_list_response;
pub use subs::{SubscriptionDiff, SubscriptionSet};
