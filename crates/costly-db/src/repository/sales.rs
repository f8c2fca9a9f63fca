//! # Recipe Sales Repository
//!
//! Append-only ledger of recipe sales (`sold_recipes_history`).

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use costly_core::SalesEntry;

/// Repository for sales ledger rows, bound to one session.
#[derive(Debug)]
pub struct SalesRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SalesRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        SalesRepository { conn }
    }

    /// Appends a sales entry.
    pub async fn append(
        &mut self,
        recipe_id: i64,
        units: i64,
        now: DateTime<Utc>,
    ) -> DbResult<SalesEntry> {
        debug!(recipe_id = %recipe_id, units = %units, "Appending sales entry");

        let result = sqlx::query(
            r#"
            INSERT INTO sold_recipes_history (recipe_id, units, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(recipe_id)
        .bind(units)
        .bind(now)
        .execute(&mut *self.conn)
        .await?;

        Ok(SalesEntry {
            id: result.last_insert_rowid(),
            recipe_id,
            units,
            created_at: now,
        })
    }

    /// Lists the sales of one recipe in insertion order.
    pub async fn find_by_recipe(&mut self, recipe_id: i64) -> DbResult<Vec<SalesEntry>> {
        let entries = sqlx::query_as::<_, SalesEntry>(
            r#"
            SELECT id, recipe_id, units, created_at
            FROM sold_recipes_history
            WHERE recipe_id = ?1
            ORDER BY id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(entries)
    }

    /// Units of `ingredient_id` consumed by every recorded sale.
    ///
    /// ```text
    /// Σ sold_recipes_history.units × recipe_ingredient.units
    /// ```
    pub async fn consumed_units(&mut self, ingredient_id: i64) -> DbResult<i64> {
        let consumed: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(s.units * ri.units), 0)
            FROM sold_recipes_history s
            JOIN recipe_ingredient ri ON ri.recipe_id = s.recipe_id
            WHERE ri.ingredient_id = ?1
            "#,
        )
        .bind(ingredient_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(consumed)
    }

    /// Counts every sales entry (for diagnostics).
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sold_recipes_history")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}
