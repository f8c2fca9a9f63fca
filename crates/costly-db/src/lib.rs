//! # costly-db: Database Layer for the Costly Ledger
//!
//! This crate provides database access for the inventory ledger.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledger Data Flow                                 │
//! │                                                                         │
//! │  Ledger operation (add_stock, add_sales, create_recipe)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     costly-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  UnitOfWork   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ Repositories  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │───►│ Ingredient    │    │ 001_initial  │  │   │
//! │  │   │ session()     │    │ Stock, Sales  │    │ _schema.sql  │  │   │
//! │  │   │ atomic()      │    │ Recipe, View  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (costly.db)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, sessions and atomic blocks
//! - [`unit_of_work`] - Repository accessors bound to one session
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use costly_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("costly.db")).await?;
//!
//! let mut session = db.session().await?;
//! let ingredients = session.ingredients().find_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use unit_of_work::{Atomic, Session, UnitOfWork};

// Repository re-exports for convenience
pub use repository::ingredient::IngredientRepository;
pub use repository::recipe::{RecipeRecord, RecipeRepository};
pub use repository::recipe_view::RecipeViewRepository;
pub use repository::sales::SalesRepository;
pub use repository::stock::StockRepository;
