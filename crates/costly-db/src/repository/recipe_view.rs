//! # Recipe View Repository
//!
//! Read model joining each recipe's composition with the ingredients'
//! current values, the input of the cost projection.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::recipe::{RecipeRecord, RecipeRepository};
use costly_core::{RecipeIngredientView, RecipeView};

/// Repository for recipe views, bound to one session.
#[derive(Debug)]
pub struct RecipeViewRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> RecipeViewRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        RecipeViewRepository { conn }
    }

    /// Gets one recipe with live ingredient values.
    ///
    /// ## Returns
    /// * `Ok(Some(RecipeView))` - Recipe found
    /// * `Ok(None)` - Recipe not found
    pub async fn find(&mut self, recipe_id: i64) -> DbResult<Option<RecipeView>> {
        let record = RecipeRepository::new(&mut *self.conn).find(recipe_id).await?;

        match record {
            Some(record) => Ok(Some(self.assemble(record).await?)),
            None => Ok(None),
        }
    }

    /// Lists every recipe with live ingredient values.
    pub async fn find_all(&mut self) -> DbResult<Vec<RecipeView>> {
        let records = RecipeRepository::new(&mut *self.conn).find_all().await?;

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            views.push(self.assemble(record).await?);
        }

        debug!(count = views.len(), "Listed recipe views");
        Ok(views)
    }

    /// Lists the ingredient lines of one recipe with current prices.
    pub async fn find_ingredients(&mut self, recipe_id: i64) -> DbResult<Vec<RecipeIngredientView>> {
        let lines = sqlx::query_as::<_, RecipeIngredientView>(
            r#"
            SELECT i.id, i.name, i.unit, i.price, ri.units
            FROM recipe_ingredient ri
            JOIN ingredient i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.rowid
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(lines)
    }

    async fn assemble(&mut self, record: RecipeRecord) -> DbResult<RecipeView> {
        let ingredients = self.find_ingredients(record.id).await?;

        Ok(RecipeView {
            id: record.id,
            name: record.name,
            ingredients,
            created_at: record.created_at,
            last_modified: record.last_modified,
        })
    }
}
