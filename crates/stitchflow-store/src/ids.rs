//! # Identifier Generation
//!
//! Entity ids and order numbers come from the creation wall-clock. This
//! is the one place in the workspace (outside the shell) that reads the
//! clock; the core crate takes these values as arguments.
//!
//! ## Collision Stance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Entity id:    milliseconds since epoch, decimal ("1705312800123")      │
//! │  Order number: "ORD-" + four digits from the sub-second clock           │
//! │                                                                         │
//! │  Neither is collision-free. The system is single-user and every         │
//! │  mutation is a discrete form submission, so same-millisecond            │
//! │  creations do not occur in practice - and the contract explicitly       │
//! │  does not promise they cannot.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;

/// Generates an entity id from the current wall-clock.
pub fn new_entity_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Generates a human-facing order number ("ORD-4217").
///
/// Four digits from the sub-second clock: cheap, short enough to read
/// over the phone, and unique enough for a counter book that also
/// carries the real id.
pub fn new_order_number() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("ORD-{:04}", nanos % 10000)
}
