//! # Error Types
//!
//! Domain-specific error types for stitchflow-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stitchflow-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  stitchflow-store errors (separate crate)                               │
//! │  └── StoreError       - Persistence failures                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (name, category, id)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. A mutation that
/// produces one of these is NOT applied - the triggering collection
/// snapshot stays untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer id does not resolve in the customer slice.
    ///
    /// ## When This Occurs
    /// - Order creation with a stale customer id
    /// - Editing a customer that was deleted in the meantime
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Service id does not resolve in the service catalog.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Staff id or username does not resolve in the staff slice.
    #[error("Staff member not found: {0}")]
    StaffNotFound(String),

    /// Order id does not resolve in the order slice.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Inventory item id does not resolve in the stockroom slice.
    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    /// An order must carry at least one line item.
    #[error("Order has no line items")]
    EmptyOrder,

    /// The measurement-presence gate failed for a line item.
    ///
    /// ## When This Occurs
    /// An order line item requests a garment category (the service's
    /// category) for which the customer has no measurement on file.
    /// The message names the missing category so the counter staff can
    /// record the fitting first.
    ///
    /// ## User Workflow
    /// ```text
    /// Create Order (service: "Standard Shirt Stitching")
    ///      │
    ///      ▼
    /// Any measurement with type ≈ "Shirt" for this customer?
    ///      │
    ///      ├── yes → proceed
    ///      │
    ///      └── no  → MissingMeasurement { customer, category: "Shirt" }
    /// ```
    #[error("No {category} measurement on file for {customer}")]
    MissingMeasurement { customer: String, category: String },

    /// A customer with the identical phone string already exists.
    ///
    /// The comparison is an exact trimmed-string match with no format
    /// normalization - "+91 98" and "9198" are different phones here.
    #[error("Customer with phone '{phone}' already exists")]
    DuplicatePhone { phone: String },

    /// Salary disbursement was requested for a staff member without a
    /// configured salary.
    #[error("No salary configured for {name}")]
    NoSalaryConfigured { name: String },

    /// Login with a username that matches no staff record.
    #[error("Unknown username: {0}")]
    UnknownUsername(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., letters in a phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
