//! # stitchflow-core: Pure Business Logic for StitchFlow
//!
//! This crate is the **heart** of StitchFlow. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StitchFlow Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     Application Shell                           │    │
//! │  │    Login ──► Dashboard ──► Orders ──► Reports ──► Job Cards     │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                 stitchflow-store (Session)                      │    │
//! │  │    nine slices in memory, snapshot-persisted on every change    │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ stitchflow-core (THIS CRATE) ★                  │    │
//! │  │                                                                 │    │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────┐     │    │
//! │  │   │  types   │ │  money   │ │  ledger   │ │  analytics   │     │    │
//! │  │   │ Customer │ │  Money   │ │  balance  │ │  summaries   │     │    │
//! │  │   │  Order   │ │ TaxRate  │ │  settle   │ │  groupings   │     │    │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────────┘     │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO CLOCK • NO NETWORK • PURE FUNCTIONS               │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Order, Measurement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation and business-key lookups
//! - [`ledger`] - Order balance math and salary disbursement
//! - [`orders`] - Order construction (the measurement-presence gate)
//! - [`analytics`] - The derived-aggregation layer behind every report
//! - [`jobcard`] - Printable workshop job cards
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output. Timestamps and generated ids flow in as arguments.
//! 2. **No I/O**: Persistence, network, and clock access are FORBIDDEN
//!    here.
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid
//!    float errors.
//! 4. **Explicit Errors**: All errors are typed, never strings or panics.
//!
//! ## Example Usage
//!
//! ```rust
//! use stitchflow_core::money::Money;
//! use stitchflow_core::types::TaxRate;
//!
//! // Create money from paise or whole rupees (never from floats!)
//! let base = Money::from_rupees(450);
//!
//! // 5% GST on a ₹450 shirt: ₹22.50
//! let tax = base.calculate_tax(TaxRate::from_bps(500));
//! assert_eq!(tax.paise(), 2250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod jobcard;
pub mod ledger;
pub mod money;
pub mod orders;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stitchflow_core::Money` instead of
// `use stitchflow_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item on an order.
///
/// ## Business Reason
/// Prevents accidental over-booking (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
