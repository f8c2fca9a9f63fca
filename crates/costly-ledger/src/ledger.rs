//! # Ledger Handle
//!
//! The entry point for every ledger operation.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ledger                                         │
//! │                                                                         │
//! │  ingredients.rs                       recipes.rs                        │
//! │  ├── create_ingredient                ├── create_recipe      (atomic)   │
//! │  ├── edit_ingredient                  ├── add_sales          (atomic)   │
//! │  ├── find_ingredient(s)               ├── get_recipe_with_cost          │
//! │  ├── add_stock           (atomic)     ├── find_recipes                  │
//! │  └── stock_history                    └── sales_history                 │
//! │                                                                         │
//! │  Database ── pool, session(), atomic()                                 │
//! │  Clock    ── timestamps for rows written by an operation               │
//! │  Policy   ── stock floor applied by add_sales                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use costly_core::{Clock, StockPolicy, SystemClock};
use costly_db::Database;
use tracing::info;

use crate::config::LedgerConfig;
use crate::error::LedgerResult;

/// Ledger operations over one database.
///
/// Cheap to clone; clones share the connection pool.
///
/// ## Example
/// ```rust,ignore
/// let ledger = Ledger::connect(&LedgerConfig::from_env()?).await?;
/// let meat = ledger.create_ingredient(CreateIngredientOptions { .. }).await?;
/// ledger.add_stock(meat.id, StockOptions { units: 500, price: 1.0 }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    pub(crate) db: Database,
    clock: Arc<dyn Clock>,
    pub(crate) stock_policy: StockPolicy,
}

impl Ledger {
    /// Wraps an open database with the system clock and `AllowNegative`.
    pub fn new(db: Database) -> Self {
        Ledger {
            db,
            clock: Arc::new(SystemClock),
            stock_policy: StockPolicy::default(),
        }
    }

    /// Opens the database described by `config` and applies its policy.
    pub async fn connect(config: &LedgerConfig) -> LedgerResult<Self> {
        let db = Database::new(config.db_config()).await?;

        info!(
            path = %config.database_path.display(),
            stock_policy = ?config.stock_policy,
            "Ledger ready"
        );

        Ok(Ledger::new(db).with_stock_policy(config.stock_policy))
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the stock floor policy.
    pub fn with_stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock_policy = policy;
        self
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    /// The underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::TimeZone;
    use costly_core::FixedClock;
    use costly_db::DbConfig;

    pub(crate) fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    pub(crate) async fn ledger() -> Ledger {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Ledger::new(db).with_clock(FixedClock::new(fixed_time()))
    }
}
