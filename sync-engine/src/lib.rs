//! # slidesync-engine
//!
//! Long-poll sliding-sync client engine.
//!
//! The engine maintains windowed views of a large server-side room list by
//! continuously re-opening a single long-poll request against a sync proxy.
//! Callers mutate lists and room subscriptions through [`SyncEngine`]; the
//! engine interrupts the in-flight poll, folds the mutation into the next
//! request, replays the server's positional list operations into local
//! index maps, and emits a strictly ordered event stream.
//!
//! ## Architecture
//!
//! ```text
//! Application → SyncEngine → Transport → sync proxy
//!                   ↓
//!           slidesync-core (pure list/replay/subscription logic)
//! ```
//!
//! I/O happens only through the [`Transport`] trait; [`MockTransport`]
//! drives the engine in tests without a network.
//!
//! ## Example
//!
//! ```ignore
//! use slidesync_engine::{EngineConfig, SyncEngine};
//! use slidesync_types::{ListParams, RangeSpec};
//!
//! let config = EngineConfig::new("https://proxy.example.org");
//! let engine = Arc::new(SyncEngine::new(config, transport, vec![ListParams {
//!     ranges: vec![RangeSpec::new(0, 19)],
//!     ..ListParams::default()
//! }]));
//!
//! let mut events = engine.subscribe();
//! tokio::spawn({
//!     let engine = Arc::clone(&engine);
//!     async move { engine.start().await }
//! });
//!
//! // Scroll the window; the in-flight poll is interrupted and replayed.
//! engine.set_list_ranges(0, vec![RangeSpec::new(20, 39)])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod engine;
mod error;
mod events;
mod extensions;
mod transport;
mod txn;

pub use config::{EngineConfig, CLIENT_TIMEOUT_BUFFER};
pub use engine::SyncEngine;
pub use error::EngineError;
pub use events::{LifecyclePhase, LifecycleUpdate, ListSnapshot, RoomUpdate, SyncUpdate};
pub use extensions::{Extension, ExtensionPhase, ExtensionRegistry};
pub use transport::{MockTransport, Transport, TransportError};
pub use txn::{TransactionLedger, TxnError, TxnHandle};
