//! # costly-core: Pure Business Logic for the Costly Ledger
//!
//! This crate holds the domain model of the inventory ledger as plain types
//! and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Costly Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Collaborator layer (HTTP, CLI)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                costly-ledger (use cases)                        │   │
//! │  │    add_stock, add_sales, create_recipe, get_recipe_with_cost    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ costly-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cost    │  │   clock   │  │ validation│  │   │
//! │  │   │Ingredient │  │ projection│  │SystemClock│  │   rules   │  │   │
//! │  │   │  Recipe   │  │           │  │FixedClock │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 costly-db (Database Layer)                      │   │
//! │  │        SQLite queries, migrations, repositories, atomic()       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Ingredient, Recipe, ledger rows, views)
//! - [`cost`] - Cost projection over a recipe's composition
//! - [`clock`] - Time source abstraction
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use costly_core::cost::project_cost;
//!
//! // 2 units at 1.5 plus 4 units at 0.25
//! let cost = project_cost([(1.5, 2), (0.25, 4)]);
//! assert_eq!(cost, 4.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod cost;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an ingredient or recipe name.
pub const MAX_NAME_LENGTH: usize = 200;
