//! Named request/response extensions carried inside the sync envelope.
//!
//! Extensions are side-channels multiplexed into the long-poll: each one
//! contributes a payload under its name in the request's `extensions` object
//! and consumes the server's payload under the same name in the response.
//!
//! Response dispatch happens in two phases relative to room-data emission:
//! [`ExtensionPhase::PreProcess`] extensions run before any room event is
//! emitted (e.g. to-device payloads that must be handled before the
//! corresponding room events), [`ExtensionPhase::PostProcess`] extensions
//! run after room emission but before the final list events.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::EngineError;

/// When an extension's `on_response` runs relative to room-data emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPhase {
    /// Before any room data is emitted for the response.
    PreProcess,
    /// After room data is emitted, before the final list events.
    PostProcess,
}

/// A named, phased extension.
pub trait Extension: Send {
    /// Unique key under `extensions` in requests and responses.
    fn name(&self) -> &str;

    /// Contribute this extension's request payload. `is_initial` is true
    /// exactly on the first request of the engine's lifetime (no sync
    /// position yet). Returning `None` omits the extension from the request.
    fn on_request(&mut self, is_initial: bool) -> Option<serde_json::Value>;

    /// Consume the server's payload for this extension.
    fn on_response(&mut self, data: &serde_json::Value);

    /// Which dispatch phase this extension runs in.
    fn phase(&self) -> ExtensionPhase;
}

/// Registry of extensions, keyed by name.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<String, Box<dyn Extension>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension. Fails when the name is already taken.
    pub fn register(&mut self, extension: Box<dyn Extension>) -> Result<(), EngineError> {
        let name = extension.name().to_string();
        if self.extensions.contains_key(&name) {
            return Err(EngineError::DuplicateExtension { name });
        }
        self.extensions.insert(name, extension);
        Ok(())
    }

    /// Build the request's `extensions` object.
    pub fn compose(&mut self, is_initial: bool) -> serde_json::Map<String, serde_json::Value> {
        let mut composed = serde_json::Map::new();
        for (name, extension) in &mut self.extensions {
            if let Some(payload) = extension.on_request(is_initial) {
                composed.insert(name.clone(), payload);
            }
        }
        composed
    }

    /// Route the response's per-extension payloads to extensions of the
    /// given phase. Extensions without a payload in this response are
    /// skipped.
    pub fn dispatch(
        &mut self,
        phase: ExtensionPhase,
        extensions: &serde_json::Map<String, serde_json::Value>,
    ) {
        for (name, extension) in &mut self.extensions {
            if extension.phase() != phase {
                continue;
            }
            if let Some(data) = extensions.get(name) {
                extension.on_response(data);
            }
        }
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether no extensions are registered.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

// Extension state is opaque; only the registered names are printable.
impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("names", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}
