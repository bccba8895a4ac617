//! Error types for the engine's public API.

use thiserror::Error;

/// Errors surfaced by [`SyncEngine`](crate::SyncEngine) operations.
///
/// Transport failures never appear here: the loop absorbs them (backoff and
/// retry) and reports them to observers through lifecycle events instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// An extension with this name is already registered.
    #[error("extension already registered: {name}")]
    DuplicateExtension {
        /// The duplicate extension name.
        name: String,
    },

    /// A list index neither addressed an existing list nor appended at the
    /// end.
    #[error("list index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of lists at the time of the call.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::IndexOutOfBounds { index: 5, len: 2 };
        assert_eq!(err.to_string(), "list index 5 out of bounds (len 2)");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
