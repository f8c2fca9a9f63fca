//! # Unit of Work
//!
//! Binds every repository to one database session so that a group of
//! reads and writes shares a single connection, and optionally a single
//! transaction.
//!
//! ## Session vs Atomic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Unit of Work                                    │
//! │                                                                         │
//! │  db.session()                       db.atomic(|unit| ...)              │
//! │  ┌───────────────────────────┐      ┌───────────────────────────────┐  │
//! │  │ UnitOfWork<PoolConnection>│      │ UnitOfWork<Transaction>       │  │
//! │  │  each statement commits   │      │  BEGIN                        │  │
//! │  │  on its own               │      │   ingredients() / stock() ... │  │
//! │  │                           │      │  Ok  ──► COMMIT               │  │
//! │  │  used for reads           │      │  Err ──► ROLLBACK             │  │
//! │  └───────────────────────────┘      └───────────────────────────────┘  │
//! │                                                                         │
//! │  Repositories borrow the session mutably, one at a time:              │
//! │    unit.ingredients().find(1).await?;                                  │
//! │    unit.stock().append(1, 5, 2.0, now).await?;                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::ops::DerefMut;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::error::{DbError, DbResult};
use crate::repository::ingredient::IngredientRepository;
use crate::repository::recipe::RecipeRepository;
use crate::repository::recipe_view::RecipeViewRepository;
use crate::repository::sales::SalesRepository;
use crate::repository::stock::StockRepository;

/// A unit of work over a pooled connection (no surrounding transaction).
pub type Session = UnitOfWork<PoolConnection<Sqlite>>;

/// A unit of work inside an open transaction.
pub type Atomic = UnitOfWork<Transaction<'static, Sqlite>>;

/// Repository accessors over one session.
#[derive(Debug)]
pub struct UnitOfWork<S> {
    session: S,
}

impl<S> UnitOfWork<S>
where
    S: DerefMut<Target = SqliteConnection>,
{
    /// Wraps a connection or transaction.
    pub fn new(session: S) -> Self {
        UnitOfWork { session }
    }

    /// Ingredient rows and their stock counters.
    pub fn ingredients(&mut self) -> IngredientRepository<'_> {
        IngredientRepository::new(&mut *self.session)
    }

    /// Stock addition ledger.
    pub fn stock(&mut self) -> StockRepository<'_> {
        StockRepository::new(&mut *self.session)
    }

    /// Recipe rows and compositions.
    pub fn recipes(&mut self) -> RecipeRepository<'_> {
        RecipeRepository::new(&mut *self.session)
    }

    /// Recipe sales ledger.
    pub fn sales(&mut self) -> SalesRepository<'_> {
        SalesRepository::new(&mut *self.session)
    }

    /// Recipes joined with live ingredient values.
    pub fn recipe_views(&mut self) -> RecipeViewRepository<'_> {
        RecipeViewRepository::new(&mut *self.session)
    }

    /// Raw access for statements no repository covers.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.session
    }
}

impl Atomic {
    /// Commits the transaction.
    ///
    /// Deferred constraint failures surface here.
    pub async fn commit(self) -> DbResult<()> {
        self.session.commit().await.map_err(DbError::from)
    }

    /// Rolls the transaction back.
    pub async fn rollback(self) -> DbResult<()> {
        self.session
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}
