//! # Recipe Repository
//!
//! Database operations for `recipe` and its composition rows
//! (`recipe_ingredient`).
//!
//! ## Composition Storage
//! ```text
//! recipe                      recipe_ingredient
//! ┌────┬───────┐             ┌───────────┬───────────────┬───────┐
//! │ id │ name  │             │ recipe_id │ ingredient_id │ units │
//! ├────┼───────┤             ├───────────┼───────────────┼───────┤
//! │  1 │ stew  │◄────────────│         1 │             3 │     2 │
//! └────┴───────┘             │         1 │             5 │     1 │
//!                            └───────────┴───────────────┴───────┘
//! ```
//! Composition rows are read back in insertion order and are never changed
//! after the recipe is created.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use costly_core::CompositionEntry;

/// A `recipe` row without its composition.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Repository for recipe rows, bound to one session.
#[derive(Debug)]
pub struct RecipeRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> RecipeRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        RecipeRepository { conn }
    }

    /// Inserts a recipe row.
    ///
    /// ## Returns
    /// * `Ok(RecipeRecord)` - The row with its assigned id
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&mut self, name: &str, now: DateTime<Utc>) -> DbResult<RecipeRecord> {
        debug!(name = %name, "Inserting recipe");

        let result = sqlx::query(
            "INSERT INTO recipe (name, created_at, last_modified) VALUES (?1, ?2, ?2)",
        )
        .bind(name)
        .bind(now)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
            other => other,
        })?;

        Ok(RecipeRecord {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
            last_modified: now,
        })
    }

    /// Links an ingredient to a recipe.
    pub async fn add_ingredient(
        &mut self,
        recipe_id: i64,
        ingredient_id: i64,
        units: i64,
    ) -> DbResult<()> {
        debug!(recipe_id = %recipe_id, ingredient_id = %ingredient_id, units = %units, "Adding recipe ingredient");

        sqlx::query(
            "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, units) VALUES (?1, ?2, ?3)",
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(units)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Gets a recipe row by id.
    pub async fn find(&mut self, id: i64) -> DbResult<Option<RecipeRecord>> {
        let record = sqlx::query_as::<_, RecipeRecord>(
            "SELECT id, name, created_at, last_modified FROM recipe WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record)
    }

    /// Lists every recipe row ordered by id.
    pub async fn find_all(&mut self) -> DbResult<Vec<RecipeRecord>> {
        let records = sqlx::query_as::<_, RecipeRecord>(
            "SELECT id, name, created_at, last_modified FROM recipe ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records)
    }

    /// Reads the composition straight from `recipe_ingredient`.
    ///
    /// No join against `ingredient`: an ingredient row that disappeared is
    /// still listed here and surfaces later as a failed stock update.
    pub async fn find_composition(&mut self, recipe_id: i64) -> DbResult<Vec<CompositionEntry>> {
        let entries = sqlx::query_as::<_, CompositionEntry>(
            r#"
            SELECT ingredient_id, units
            FROM recipe_ingredient
            WHERE recipe_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(entries)
    }

    /// Counts recipes (for diagnostics).
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}
