//! # Validation Module
//!
//! Input validation utilities for Khata Billing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Business rule validation before stock or bill mutations           │
//! │  └── Shared by the application shell and the engine's entry points     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine invariants                                            │
//! │  └── Guarded deductions, assembled-bill totals                         │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::validation::{validate_target_total, validate_unit_price};
//!
//! validate_unit_price(80).unwrap();
//! validate_target_total(450).unwrap();
//! assert!(validate_target_total(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a stock item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price in rupees.
///
/// ## Rules
/// - Must be positive (> 0); zero-priced items can never contribute to a
///   target total and are excluded from billing entirely
pub fn validate_unit_price(rupees: i64) -> ValidationResult<()> {
    if rupees <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Validates an on-hand stock quantity.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero means out of stock, not invalid
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "available_quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a bill line quantity.
///
/// ## Rules
/// - Must be between 1 and MAX_LINE_QUANTITY (2)
///
/// ## User Workflow
/// ```text
/// synthesized line (qty q)
///      │
///      ▼
/// validate_line_quantity(q) ← THIS FUNCTION
///      │
///      ├── q <= 0? → Error: "quantity must be between 1 and 2"
///      ├── q > 2?  → Error: "quantity must be between 1 and 2"
///      └── OK → line accepted onto the bill
/// ```
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 || quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a transaction's target total.
///
/// ## Rules
/// - Must be positive (> 0); non-positive targets are skipped by the batch
///   rather than billed
pub fn validate_target_total(rupees: i64) -> ValidationResult<()> {
    if rupees <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "target_total".to_string(),
        });
    }

    Ok(())
}

/// Validates a starting bill number.
///
/// ## Rules
/// - Must be positive; bill books start at 1
pub fn validate_starting_bill_number(number: i64) -> ValidationResult<()> {
    if number <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "starting_bill_number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format, 36 characters with hyphens
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
