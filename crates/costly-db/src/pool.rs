//! # Database Pool Management
//!
//! Connection pool creation, sessions and atomic blocks for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Ledger startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├── db.session()  ──► UnitOfWork over one pooled connection      │
//! │       └── db.atomic(..) ──► UnitOfWork over one transaction            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so readers don't block
//! the single writer. Atomic blocks open with `BEGIN IMMEDIATE`, so
//! concurrent writers queue on the database lock for up to `busy_timeout`
//! before failing.

use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::unit_of_work::{Atomic, Session, UnitOfWork};

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/costly.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// How long a writer waits on a locked database.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the lock wait for writers.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every pooled connection to `:memory:` would see its own empty
    /// database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle. Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous
    ///    - Foreign keys enabled
    ///    - Busy timeout for queued writers
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or migration failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Called by `new()` when `run_migrations` is true. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Acquires a pooled connection wrapped in a unit of work.
    ///
    /// Statements run outside any explicit transaction. Use for reads.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let mut session = db.session().await?;
    /// let ingredients = session.ingredients().find_all().await?;
    /// ```
    pub async fn session(&self) -> DbResult<Session> {
        let conn = self.pool.acquire().await?;
        Ok(UnitOfWork::new(conn))
    }

    /// Runs `op` inside one write transaction (`BEGIN IMMEDIATE`).
    ///
    /// ## Outcome
    /// ```text
    /// op returns Ok(value) ──► COMMIT   ──► Ok(value)
    ///                              └── commit fails ──► Err(DbError → E)
    /// op returns Err(e)    ──► ROLLBACK ──► Err(e)
    /// ```
    ///
    /// The closure receives the unit of work and must return a boxed future
    /// borrowing it; values it needs are moved in.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let level = db
    ///     .atomic(move |unit| {
    ///         Box::pin(async move {
    ///             unit.ingredients().decrease_stock(id, 3, now).await
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn atomic<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: for<'u> FnOnce(&'u mut Atomic) -> BoxFuture<'u, Result<T, E>>,
        E: From<DbError>,
    {
        // Write lock at BEGIN; concurrent writers wait out busy_timeout here.
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut unit = UnitOfWork::new(tx);
        let outcome = op(&mut unit).await;

        match outcome {
            Ok(value) => {
                unit.commit().await?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                debug!("Transaction rolled back");
                Err(err)
            }
        }
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all sessions and atomic blocks fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use costly_core::{NewIngredient, Unit};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn meat() -> NewIngredient {
        NewIngredient {
            name: "meat".to_string(),
            unit: Unit::Gram,
            price: 1.0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = db().await;

        assert!(db.health_check().await);
        let (total, applied) = db.migration_status().await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .busy_timeout(Duration::from_millis(250));

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_ingredient_insert_and_find() {
        let db = db().await;
        let mut session = db.session().await.unwrap();

        let inserted = session.ingredients().insert(&meat()).await.unwrap();
        assert_eq!(inserted.units_in_stock, 0);

        let found = session.ingredients().find(inserted.id).await.unwrap().unwrap();
        assert_eq!(found.name, "meat");
        assert_eq!(found.unit, Unit::Gram);
        assert!(session.ingredients().find(inserted.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_ingredient_name() {
        let db = db().await;
        let mut session = db.session().await.unwrap();

        session.ingredients().insert(&meat()).await.unwrap();
        let err = session.ingredients().insert(&meat()).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "meat"));
    }

    #[tokio::test]
    async fn test_stock_delta_on_missing_ingredient_is_not_found() {
        let db = db().await;
        let mut session = db.session().await.unwrap();
        let now = Utc::now();

        let err = session.ingredients().increase_stock(42, 5, 1.0, now).await.unwrap_err();
        assert!(err.is_not_found());

        let err = session.ingredients().decrease_stock(42, 5, now).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_decrease_stock_may_go_negative() {
        let db = db().await;
        let mut session = db.session().await.unwrap();
        let id = session.ingredients().insert(&meat()).await.unwrap().id;

        let level = session.ingredients().decrease_stock(id, 3, Utc::now()).await.unwrap();
        assert_eq!(level, -3);
    }

    #[tokio::test]
    async fn test_atomic_commits_on_ok() {
        let db = db().await;
        let new = meat();

        let id = db
            .atomic(move |unit| {
                Box::pin(async move {
                    let ingredient = unit.ingredients().insert(&new).await?;
                    unit.stock().append(ingredient.id, 4, 2.0, new.created_at).await?;
                    unit.ingredients()
                        .increase_stock(ingredient.id, 4, 2.0, new.created_at)
                        .await?;
                    Ok::<_, DbError>(ingredient.id)
                })
            })
            .await
            .unwrap();

        let mut session = db.session().await.unwrap();
        let ingredient = session.ingredients().find(id).await.unwrap().unwrap();
        assert_eq!(ingredient.units_in_stock, 4);
        assert_eq!(ingredient.price, 2.0);
        assert_eq!(session.stock().total_units(id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_atomic_rolls_back_on_err() {
        let db = db().await;
        let now = Utc::now();

        let err = db
            .atomic(move |unit| {
                Box::pin(async move {
                    unit.stock().append(42, 5, 1.0, now).await?;
                    unit.ingredients().increase_stock(42, 5, 1.0, now).await?;
                    Ok::<_, DbError>(())
                })
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());

        let mut session = db.session().await.unwrap();
        assert_eq!(session.stock().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deferred_foreign_key_fails_commit() {
        let db = db().await;
        let now = Utc::now();

        let err = db
            .atomic(move |unit| {
                Box::pin(async move {
                    unit.stock().append(42, 5, 1.0, now).await?;
                    Ok::<_, DbError>(())
                })
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let mut session = db.session().await.unwrap();
        assert_eq!(session.stock().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_history_tables_are_append_only() {
        let db = db().await;
        let mut session = db.session().await.unwrap();
        let id = session.ingredients().insert(&meat()).await.unwrap().id;
        let entry = session.stock().append(id, 5, 1.0, Utc::now()).await.unwrap();
        let found = session.stock().find(entry.id).await.unwrap().unwrap();
        assert_eq!((found.ingredient_id, found.units), (id, 5));

        let update = sqlx::query("UPDATE stock_history SET units = 1")
            .execute(session.connection())
            .await
            .map_err(DbError::from)
            .unwrap_err();
        assert!(update.to_string().contains("append-only"));

        let delete = sqlx::query("DELETE FROM stock_history")
            .execute(session.connection())
            .await
            .map_err(DbError::from)
            .unwrap_err();
        assert!(delete.to_string().contains("append-only"));

        assert_eq!(session.stock().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recipe_view_keeps_composition_order() {
        let db = db().await;
        let mut session = db.session().await.unwrap();
        let now = Utc::now();

        let meat = session.ingredients().insert(&meat()).await.unwrap();
        let salt = session
            .ingredients()
            .insert(&NewIngredient {
                name: "salt".to_string(),
                unit: Unit::Gram,
                price: 0.5,
                created_at: now,
            })
            .await
            .unwrap();

        let recipe = session.recipes().insert("stew", now).await.unwrap();
        session.recipes().add_ingredient(recipe.id, salt.id, 1).await.unwrap();
        session.recipes().add_ingredient(recipe.id, meat.id, 2).await.unwrap();

        let view = session.recipe_views().find(recipe.id).await.unwrap().unwrap();
        let ids: Vec<i64> = view.ingredients.iter().map(|line| line.id).collect();
        assert_eq!(ids, vec![salt.id, meat.id]);
        assert_eq!(view.cost(), 2.5);

        let composition = session.recipes().find_composition(recipe.id).await.unwrap();
        assert_eq!(composition.len(), 2);
        assert_eq!(composition[0].ingredient_id, salt.id);

        assert!(session.recipe_views().find(recipe.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consumed_units_follow_sales() {
        let db = db().await;
        let mut session = db.session().await.unwrap();
        let now = Utc::now();

        let meat = session.ingredients().insert(&meat()).await.unwrap();
        let recipe = session.recipes().insert("steak", now).await.unwrap();
        session.recipes().add_ingredient(recipe.id, meat.id, 3).await.unwrap();

        session.sales().append(recipe.id, 2, now).await.unwrap();
        session.sales().append(recipe.id, 1, now).await.unwrap();

        assert_eq!(session.sales().consumed_units(meat.id).await.unwrap(), 9);
        assert_eq!(session.sales().find_by_recipe(recipe.id).await.unwrap().len(), 2);
    }
}
