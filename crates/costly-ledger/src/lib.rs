//! # costly-ledger: Atomic Inventory Ledger
//!
//! Ledger operations over the costly database: stock additions and recipe
//! sales that update running counters and append audit rows atomically,
//! recipe creation, and the cost projection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Costly Architecture                              │
//! │                                                                         │
//! │  Collaborator layer (HTTP handlers, CLI, seed binary)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 costly-ledger (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   Ledger ── ingredients.rs ── recipes.rs                        │   │
//! │  │   LedgerError / ErrorKind     LedgerConfig                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                         │                                       │
//! │       ▼                         ▼                                       │
//! │  costly-core               costly-db                                   │
//! │  (types, validation,       (pool, unit of work, repositories)          │
//! │   cost projection)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use costly_ledger::{CreateIngredientOptions, Ledger, LedgerConfig, StockOptions};
//!
//! let ledger = Ledger::connect(&LedgerConfig::from_env()?).await?;
//! let meat = ledger
//!     .create_ingredient(CreateIngredientOptions { name: "meat".into(), unit: Unit::Gram, price: 1.0 })
//!     .await?;
//! ledger.add_stock(meat.id, StockOptions { units: 500, price: 1.0 }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ingredients;
pub mod ledger;
pub mod recipes;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, LedgerConfig};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use ingredients::{CreateIngredientOptions, EditIngredientOptions, StockOptions};
pub use ledger::Ledger;
pub use recipes::CreateRecipeOptions;
