//! # Validation Module
//!
//! Input validation utilities for StitchFlow.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form surface (out of scope here)                              │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field validation                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Business rules (duplicate phone, measurement gate)            │
//! │           in ledger/orders/session code                                 │
//! │                                                                         │
//! │  A mutation that fails any layer is NOT applied.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Customer;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a person name (customer or staff).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 120 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Digits plus the usual separators (`+ - ( ) space`) only
///
/// The string is otherwise taken as entered - no normalization. The
/// duplicate check downstream compares these raw strings, so
/// "+91 9876543210" and "9876543210" are two different customers.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(())
}

/// Validates a login username.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 40 characters
/// - Lowercase alphanumeric only (the form lowercases on entry; the
///   validator holds the line)
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() > 40 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 40,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must be lowercase letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Business-Key Lookups
// =============================================================================

/// Finds an existing customer carrying the identical phone string.
///
/// ## Comparison Semantics
/// Exact match on the trimmed strings. Deliberately no digit
/// extraction, no country-code folding - the phone is a soft business
/// key, entered once and compared as entered.
///
/// ## Example
/// ```rust
/// use stitchflow_core::validation::find_duplicate_phone;
/// # use stitchflow_core::types::Customer;
/// # use chrono::NaiveDate;
/// let customers = vec![Customer {
///     id: "1".into(),
///     name: "Rahul Sharma".into(),
///     phone: "9876543210".into(),
///     email: None,
///     address: None,
///     created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// }];
/// assert!(find_duplicate_phone(&customers, " 9876543210 ").is_some());
/// assert!(find_duplicate_phone(&customers, "+91 9876543210").is_none());
/// ```
pub fn find_duplicate_phone<'a>(customers: &'a [Customer], phone: &str) -> Option<&'a Customer> {
    let phone = phone.trim();
    customers.iter().find(|c| c.phone.trim() == phone)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn customer(id: &str, phone: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: "Test Customer".to_string(),
            phone: phone.to_string(),
            email: None,
            address: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Rahul Sharma").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("not a phone").is_err());
        assert!(validate_phone(&"9".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("john2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("John").is_err());
        assert!(validate_username("a b").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(500).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_find_duplicate_phone_exact_match_only() {
        let customers = vec![customer("1", "9876543210")];

        assert!(find_duplicate_phone(&customers, "9876543210").is_some());
        assert!(find_duplicate_phone(&customers, "  9876543210  ").is_some());
        // Different formatting of the same number is NOT a duplicate.
        assert!(find_duplicate_phone(&customers, "+91 9876543210").is_none());
        assert!(find_duplicate_phone(&customers, "987-654-3210").is_none());
    }
}
