//! # Error Types
//!
//! Domain-specific error types for costly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  costly-core errors (this file)                                        │
//! │  └── ValidationError  - Bad options supplied by the caller             │
//! │                                                                         │
//! │  costly-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  costly-ledger errors                                                  │
//! │  └── LedgerError      - NotFound / BadOptions / Storage                │
//! │                                                                         │
//! │  Flow: ValidationError ──┐                                             │
//! │        DbError ──────────┴──► LedgerError ──► collaborator layer       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, ingredient id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant is a "bad options" outcome: the request is rejected before
/// (or while) touching the ledger and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Floating point value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., unknown measurement unit).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A recipe was submitted without ingredients.
    #[error("recipe must have at least one ingredient")]
    EmptyComposition,

    /// The same ingredient appears twice in one composition.
    #[error("ingredient {ingredient_id} appears more than once in the recipe")]
    DuplicateIngredient { ingredient_id: i64 },

    /// A composition entry references an ingredient that does not exist.
    #[error("ingredient {ingredient_id} does not exist")]
    UnknownIngredient { ingredient_id: i64 },
}

// =============================================================================
// Unit Tests
// =============================================================================
