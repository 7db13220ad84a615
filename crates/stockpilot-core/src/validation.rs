//! # Validation Module
//!
//! Input validation utilities for StockPilot.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP deserialization (serde)                                 │
//! │  ├── Type checks, unknown-field rejection                              │
//! │  └── e.g. a `quantity` key on a catalog payload fails here             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - value rules                                    │
//! │  ├── Non-empty SKU, length limits, non-negative prices                 │
//! │  └── Non-zero movement change                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / FOREIGN KEY constraints                       │
//! │  └── The guarded quantity update (never below zero)                    │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockpilot_core::validation::{validate_sku, validate_change};
//!
//! // Validate SKU before database insert
//! validate_sku("WID-001").unwrap();
//!
//! // Validate a movement delta before touching the ledger
//! validate_change(-3).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{NewMovement, NewProduct, ProductUpdate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockpilot_core::validation::validate_sku;
///
/// assert!(validate_sku("WID-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    // Check for valid characters (alphanumeric, hyphen, underscore)
    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product, supplier).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 255 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 255 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 255,
        });
    }

    Ok(())
}

/// Validates a category name. Uniqueness is the database's job; shape is ours.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
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

/// Validates a movement reason ("purchase", "sale", "adjustment", ...).
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount (price or cost).
///
/// ## Rules
/// - Must be finite (NaN and infinities are deserializable but meaningless)
/// - Must not be negative
pub fn validate_money(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if amount < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a movement delta.
///
/// A change of exactly 0 is rejected: a zero-quantity movement would pad
/// the audit trail without meaning anything.
pub fn validate_change(change: i64) -> ValidationResult<()> {
    if change == 0 {
        return Err(ValidationError::ZeroChange);
    }

    Ok(())
}

/// Validates a reorder level.
pub fn validate_reorder_level(level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::Negative {
            field: "reorder_level".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates a full product creation payload.
pub fn validate_new_product(p: &NewProduct) -> ValidationResult<()> {
    validate_sku(&p.sku)?;
    validate_name("name", &p.name)?;
    validate_money("price", p.price)?;
    validate_money("cost", p.cost)?;
    validate_reorder_level(p.reorder_level)?;
    Ok(())
}

/// Validates the fields present on a product patch.
pub fn validate_product_update(p: &ProductUpdate) -> ValidationResult<()> {
    if let Some(ref sku) = p.sku {
        validate_sku(sku)?;
    }
    if let Some(ref name) = p.name {
        validate_name("name", name)?;
    }
    if let Some(price) = p.price {
        validate_money("price", price)?;
    }
    if let Some(cost) = p.cost {
        validate_money("cost", cost)?;
    }
    if let Some(level) = p.reorder_level {
        validate_reorder_level(level)?;
    }
    Ok(())
}

/// Validates a movement payload before it reaches the ledger.
pub fn validate_new_movement(m: &NewMovement) -> ValidationResult<()> {
    validate_change(m.change)?;
    validate_reason(&m.reason)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("WID-001").is_ok());
        assert!(validate_sku("abc_123").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has spaces").is_err());
        assert!(validate_sku(&"X".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Widget").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"n".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money("price", 0.0).is_ok());
        assert!(validate_money("price", 19.99).is_ok());
        assert!(validate_money("price", -0.01).is_err());
        assert!(validate_money("price", f64::NAN).is_err());
        assert!(validate_money("price", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_change_rejects_zero() {
        assert!(validate_change(1).is_ok());
        assert!(validate_change(-1).is_ok());
        assert!(validate_change(0).is_err());
    }

    #[test]
    fn test_validate_new_movement() {
        let m = NewMovement {
            product_id: 1,
            change: -3,
            reason: "sale".to_string(),
            reference: None,
        };
        assert!(validate_new_movement(&m).is_ok());

        let zero = NewMovement { change: 0, ..m.clone() };
        assert!(validate_new_movement(&zero).is_err());

        let unexplained = NewMovement {
            reason: "  ".to_string(),
            ..m
        };
        assert!(validate_new_movement(&unexplained).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let p = NewProduct {
            sku: "WID-001".to_string(),
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            cost: 4.5,
            reorder_level: 5,
            is_active: true,
            category_id: None,
            supplier_id: None,
        };
        assert!(validate_new_product(&p).is_ok());

        let negative = NewProduct { cost: -1.0, ..p };
        assert!(validate_new_product(&negative).is_err());
    }
}
