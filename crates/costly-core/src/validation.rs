//! # Validation Module
//!
//! Input validation for ledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Collaborator (HTTP handler, CLI)                             │
//! │  └── Deserialization into typed options                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ledger operation (Rust)                                      │
//! │  └── THIS MODULE: names, quantities, prices, compositions              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (price > 0, units > 0)                          │
//! │  ├── UNIQUE constraints (names)                                        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use costly_core::validation::{validate_name, validate_price, validate_units};
//!
//! validate_name("name", "meat").unwrap();
//! validate_price(1.0).unwrap();
//! assert!(validate_units("units", 0).is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::CompositionEntry;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an ingredient or recipe name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most `MAX_NAME_LENGTH` characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a per-unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Must be strictly positive (free ingredients are not allowed)
///
/// ## Example
/// ```rust
/// use costly_core::validation::validate_price;
///
/// assert!(validate_price(0.01).is_ok());
/// assert!(validate_price(0.0).is_err());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if price <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity (stock units, sold units, units per recipe).
pub fn validate_units(field: &str, units: i64) -> ValidationResult<()> {
    if units <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a recipe composition.
///
/// ## Rules
/// - At least one entry
/// - Every entry has `units > 0`
/// - No ingredient appears twice
///
/// Whether the referenced ingredients exist is checked later, inside the
/// transaction that creates the recipe.
pub fn validate_composition(entries: &[CompositionEntry]) -> ValidationResult<()> {
    if entries.is_empty() {
        return Err(ValidationError::EmptyComposition);
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        validate_units("units", entry.units)?;

        if !seen.insert(entry.ingredient_id) {
            return Err(ValidationError::DuplicateIngredient {
                ingredient_id: entry.ingredient_id,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ingredient_id: i64, units: i64) -> CompositionEntry {
        CompositionEntry {
            ingredient_id,
            units,
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  meat ").unwrap(), "meat");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name("name", &"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(1.0).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-3.0).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_units() {
        assert!(validate_units("units", 1).is_ok());
        assert_eq!(
            validate_units("units", 0),
            Err(ValidationError::MustBePositive {
                field: "units".to_string()
            })
        );
        assert!(validate_units("units", -5).is_err());
    }

    #[test]
    fn test_validate_composition() {
        assert!(validate_composition(&[entry(1, 2), entry(2, 1)]).is_ok());
        assert_eq!(
            validate_composition(&[]),
            Err(ValidationError::EmptyComposition)
        );
        assert!(validate_composition(&[entry(1, 0)]).is_err());
        assert_eq!(
            validate_composition(&[entry(1, 1), entry(1, 3)]),
            Err(ValidationError::DuplicateIngredient { ingredient_id: 1 })
        );
    }
}
