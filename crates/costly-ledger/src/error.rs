//! # Ledger Error Types
//!
//! The error surface of every ledger operation.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    LedgerError → ErrorKind                              │
//! │                                                                         │
//! │  NotFound           ── unknown ingredient / recipe   ──► NOT_FOUND      │
//! │  BadOptions         ── ValidationError               ──► BAD_OPTIONS    │
//! │  InsufficientStock  ── StockPolicy::RejectNegative   ──► INSUFFICIENT_  │
//! │                                                           STOCK         │
//! │  Storage            ── any other DbError             ──► STORAGE        │
//! │                                                                         │
//! │  Every error raised inside an atomic block rolls the block back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use costly_core::ValidationError;
use costly_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced ingredient or recipe does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The caller supplied invalid options.
    #[error("Bad options: {0}")]
    BadOptions(#[from] ValidationError),

    /// A sale would leave an ingredient below zero stock.
    #[error(
        "Insufficient stock for ingredient {ingredient_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        ingredient_id: i64,
        available: i64,
        requested: i64,
    },

    /// The store failed (constraint, connection, commit).
    #[error("Storage error: {0}")]
    Storage(DbError),
}

/// Converts database errors, lifting `NotFound` out of the storage bucket.
impl From<DbError> for LedgerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            other => LedgerError::Storage(other),
        }
    }
}

/// Machine-readable error category for the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    BadOptions,
    InsufficientStock,
    Storage,
}

impl LedgerError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::BadOptions(_) => ErrorKind::BadOptions,
            LedgerError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            LedgerError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_lifts_to_not_found() {
        let err: LedgerError = DbError::not_found("Ingredient", 3).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Ingredient not found: 3");
    }

    #[test]
    fn test_other_db_errors_are_storage() {
        let err: LedgerError = DbError::duplicate("recipe.name", "stew").into();
        assert_eq!(err.kind(), ErrorKind::Storage);

        let err: LedgerError = DbError::PoolExhausted.into();
        assert!(matches!(err, LedgerError::Storage(DbError::PoolExhausted)));
    }

    #[test]
    fn test_validation_is_bad_options() {
        let err: LedgerError = ValidationError::EmptyComposition.into();
        assert_eq!(err.kind(), ErrorKind::BadOptions);
    }

    #[test]
    fn test_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::InsufficientStock).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_STOCK\"");
    }
}
