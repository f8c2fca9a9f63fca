//! # Repository Module
//!
//! Database repository implementations for the ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over one session                        │
//! │                                                                         │
//! │  Ledger operation                                                      │
//! │       │                                                                 │
//! │       │  unit.ingredients().increase_stock(id, 5, 2.0, now)            │
//! │       ▼                                                                 │
//! │  UnitOfWork (connection or transaction)                                │
//! │       │                                                                 │
//! │       ├── IngredientRepository   ingredient                            │
//! │       ├── StockRepository        stock_history          (append-only)  │
//! │       ├── RecipeRepository       recipe, recipe_ingredient             │
//! │       ├── SalesRepository        sold_recipes_history   (append-only)  │
//! │       └── RecipeViewRepository   recipe ⋈ ingredient    (read model)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository borrows `&mut SqliteConnection` for its lifetime, so all
//! statements issued through one unit of work share its transaction.
//!
//! ## Available Repositories
//!
//! - [`IngredientRepository`](ingredient::IngredientRepository) - Ingredient rows and stock counters
//! - [`StockRepository`](stock::StockRepository) - Stock addition ledger
//! - [`RecipeRepository`](recipe::RecipeRepository) - Recipes and compositions
//! - [`SalesRepository`](sales::SalesRepository) - Recipe sales ledger
//! - [`RecipeViewRepository`](recipe_view::RecipeViewRepository) - Recipes with live prices

pub mod ingredient;
pub mod recipe;
pub mod recipe_view;
pub mod sales;
pub mod stock;
