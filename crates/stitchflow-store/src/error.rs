//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds the slice key and chosen policy        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionError (session.rs) ← joins business errors from core            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller surfaces the message; no automatic retry anywhere               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a slice file failed.
    ///
    /// ## When This Occurs
    /// - Data directory is not writable
    /// - Disk full
    /// - File vanished between existence check and read
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A slice file exists but does not deserialize.
    ///
    /// ## Policy
    /// The session treats this as recoverable: it logs a warning and
    /// hydrates the slice from its seed default. The corrupt file is
    /// overwritten by the next snapshot write.
    #[error("Corrupt data in slice '{key}': {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A slice value failed to serialize.
    ///
    /// Should not happen for well-formed domain types; surfaced rather
    /// than swallowed in case it ever does.
    #[error("Cannot serialize slice '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = StoreError::Io {
            path: PathBuf::from("/data/stitchflow_orders.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("stitchflow_orders.json"));
    }
}
