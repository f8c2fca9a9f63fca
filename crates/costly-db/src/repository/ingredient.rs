//! # Ingredient Repository
//!
//! Database operations for the `ingredient` table.
//!
//! ## Key Operations
//! - Insert / lookup / list
//! - Rename or change unit
//! - Stock counter deltas (used only by ledger operations)
//!
//! ## Delta Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Read-modify-write (lost update under concurrency)              │
//! │     SELECT units_in_stock ... ; UPDATE ... SET units_in_stock = 7  │
//! │                                                                     │
//! │  ✅ Delta update, row-locked by the store                          │
//! │     UPDATE ingredient SET units_in_stock = units_in_stock - 6      │
//! │                                                                     │
//! │  Zero rows affected ⇒ the ingredient does not exist ⇒ NotFound     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use costly_core::{Ingredient, NewIngredient, Unit};

const SELECT_INGREDIENT: &str = r#"
    SELECT id, name, unit, price, units_in_stock, created_at, last_modified
    FROM ingredient
"#;

/// Repository for ingredient rows, bound to one session.
///
/// ## Usage
/// ```rust,ignore
/// let mut session = db.session().await?;
/// let ingredient = session.ingredients().find(1).await?;
/// ```
#[derive(Debug)]
pub struct IngredientRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> IngredientRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        IngredientRepository { conn }
    }

    /// Inserts a new ingredient with zero stock.
    ///
    /// ## Returns
    /// * `Ok(Ingredient)` - Inserted ingredient with its assigned id
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&mut self, new: &NewIngredient) -> DbResult<Ingredient> {
        debug!(name = %new.name, unit = %new.unit, "Inserting ingredient");

        let result = sqlx::query(
            r#"
            INSERT INTO ingredient (
                name, unit, price, units_in_stock, created_at, last_modified
            ) VALUES (?1, ?2, ?3, 0, ?4, ?4)
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.unit)
        .bind(new.price)
        .bind(new.created_at)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, new.name.clone()),
            other => other,
        })?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            unit: new.unit,
            price: new.price,
            units_in_stock: 0,
            created_at: new.created_at,
            last_modified: new.created_at,
        })
    }

    /// Gets an ingredient by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Ingredient))` - Ingredient found
    /// * `Ok(None)` - Ingredient not found
    pub async fn find(&mut self, id: i64) -> DbResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(&format!("{SELECT_INGREDIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(ingredient)
    }

    /// Lists every ingredient ordered by id.
    pub async fn find_all(&mut self) -> DbResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(&format!("{SELECT_INGREDIENT} ORDER BY id"))
            .fetch_all(&mut *self.conn)
            .await?;

        debug!(count = ingredients.len(), "Listed ingredients");
        Ok(ingredients)
    }

    /// Renames an ingredient or changes its unit.
    ///
    /// Price and stock are left untouched; only ledger operations move them.
    pub async fn update_details(
        &mut self,
        id: i64,
        name: &str,
        unit: Unit,
        now: DateTime<Utc>,
    ) -> DbResult<Ingredient> {
        debug!(id = %id, name = %name, "Updating ingredient details");

        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredient
            SET name = ?2, unit = ?3, last_modified = ?4
            WHERE id = ?1
            RETURNING id, name, unit, price, units_in_stock, created_at, last_modified
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .bind(now)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
            other => other,
        })?
        .ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    /// Adds restocked units and moves the current price to `price`.
    ///
    /// ## Returns
    /// * `Ok(Ingredient)` - The ingredient after the update
    /// * `Err(DbError::NotFound)` - No ingredient with this id
    pub async fn increase_stock(
        &mut self,
        id: i64,
        units: i64,
        price: f64,
        now: DateTime<Utc>,
    ) -> DbResult<Ingredient> {
        debug!(id = %id, units = %units, price = %price, "Increasing stock");

        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredient
            SET units_in_stock = units_in_stock + ?2,
                price = ?3,
                last_modified = ?4
            WHERE id = ?1
            RETURNING id, name, unit, price, units_in_stock, created_at, last_modified
            "#,
        )
        .bind(id)
        .bind(units)
        .bind(price)
        .bind(now)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    /// Subtracts consumed units. No floor is applied here.
    ///
    /// ## Returns
    /// * `Ok(i64)` - The stock level after the decrement
    /// * `Err(DbError::NotFound)` - No ingredient with this id
    pub async fn decrease_stock(&mut self, id: i64, units: i64, now: DateTime<Utc>) -> DbResult<i64> {
        debug!(id = %id, units = %units, "Decreasing stock");

        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE ingredient
            SET units_in_stock = units_in_stock - ?2,
                last_modified = ?3
            WHERE id = ?1
            RETURNING units_in_stock
            "#,
        )
        .bind(id)
        .bind(units)
        .bind(now)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    /// Counts ingredients (for diagnostics).
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredient")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}
