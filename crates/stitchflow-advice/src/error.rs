//! # Advisory Error Types
//!
//! Typed failures for the advisory exchange. Every one of these ends
//! the same way for the business operation: swallowed by the fallback
//! wrapper and logged at WARN. The typing exists for the log line and
//! for tests.

use thiserror::Error;

/// Advisory call errors.
#[derive(Debug, Error)]
pub enum AdviceError {
    /// No API key configured; the advisor was built but cannot call out.
    #[error("Advisory service not configured (missing API key)")]
    NotConfigured,

    /// The request never completed at the transport level.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status (quota, auth,
    /// server error).
    #[error("Upstream returned HTTP {status}")]
    Upstream { status: u16 },

    /// The response arrived but did not match the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The response parsed but carried no usable text.
    #[error("Response contained no advice text")]
    EmptyResponse,

    /// The defensive outer deadline elapsed.
    #[error("Advisory call timed out")]
    TimedOut,
}

/// Result type for advisory operations.
pub type AdviceResult<T> = Result<T, AdviceError>;
