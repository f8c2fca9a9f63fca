//! # Ingredient Stock Repository
//!
//! Append-only ledger of stock additions (`stock_history`).
//!
//! Rows are inserted once and never updated or deleted; the table carries
//! triggers that abort any `UPDATE` or `DELETE`.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use costly_core::StockEntry;

/// Repository for stock ledger rows, bound to one session.
#[derive(Debug)]
pub struct StockRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> StockRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        StockRepository { conn }
    }

    /// Appends a stock entry.
    ///
    /// The ingredient reference is checked when the transaction commits, so
    /// inside an atomic block the caller detects unknown ingredients through
    /// the counter update that follows.
    pub async fn append(
        &mut self,
        ingredient_id: i64,
        units: i64,
        price: f64,
        now: DateTime<Utc>,
    ) -> DbResult<StockEntry> {
        debug!(ingredient_id = %ingredient_id, units = %units, "Appending stock entry");

        let result = sqlx::query(
            r#"
            INSERT INTO stock_history (ingredient_id, units, price, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(ingredient_id)
        .bind(units)
        .bind(price)
        .bind(now)
        .execute(&mut *self.conn)
        .await?;

        Ok(StockEntry {
            id: result.last_insert_rowid(),
            ingredient_id,
            units,
            price,
            created_at: now,
        })
    }

    /// Gets a stock entry by id.
    pub async fn find(&mut self, id: i64) -> DbResult<Option<StockEntry>> {
        let entry = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT id, ingredient_id, units, price, created_at
            FROM stock_history
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(entry)
    }

    /// Lists the stock history of one ingredient in insertion order.
    pub async fn find_by_ingredient(&mut self, ingredient_id: i64) -> DbResult<Vec<StockEntry>> {
        let entries = sqlx::query_as::<_, StockEntry>(
            r#"
            SELECT id, ingredient_id, units, price, created_at
            FROM stock_history
            WHERE ingredient_id = ?1
            ORDER BY id
            "#,
        )
        .bind(ingredient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(entries)
    }

    /// Sum of all stocked units for one ingredient (0 if none).
    pub async fn total_units(&mut self, ingredient_id: i64) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(units), 0) FROM stock_history WHERE ingredient_id = ?1",
        )
        .bind(ingredient_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(total)
    }

    /// Counts every stock entry (for diagnostics).
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_history")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}
