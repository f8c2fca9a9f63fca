//! # Recipe Operations
//!
//! Recipe creation, recipe sales and the cost projection.
//!
//! ## AddSales
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_sales(recipe_id, sold_units)                                       │
//! │                                                                         │
//! │  validate sold_units > 0                ── BadOptions                   │
//! │  BEGIN IMMEDIATE                                                        │
//! │   1. load recipe + composition          ── NotFound ── ROLLBACK         │
//! │   2. for each (ingredient, units):                                      │
//! │        UPDATE ingredient                                                │
//! │        SET units_in_stock -= units × sold_units                         │
//! │        no row updated                   ── NotFound ── ROLLBACK         │
//! │        below zero and RejectNegative    ── InsufficientStock ── ROLLBACK│
//! │   3. INSERT sold_recipes_history                                        │
//! │  COMMIT                                 ── SalesEntry                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cost
//! Always computed from the ingredients' current prices. A recipe carries no
//! price of its own, so restocking at a new price changes the cost of every
//! recipe using that ingredient.

use costly_core::validation::{validate_composition, validate_name, validate_units};
use costly_core::{CompositionEntry, Recipe, RecipeIngredient, RecipeView, SalesEntry, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// Options for [`Ledger::create_recipe`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecipeOptions {
    pub name: String,
    /// Ingredient lines, in the order they are listed.
    pub ingredients: Vec<CompositionEntry>,
}

impl Ledger {
    /// Creates a recipe and its composition in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Recipe)` - The recipe with ingredient snapshots
    /// * `Err(LedgerError::BadOptions)` - Empty name or composition, bad
    ///   units, repeated or unknown ingredient
    /// * `Err(LedgerError::Storage)` - Name already taken
    pub async fn create_recipe(&self, options: CreateRecipeOptions) -> LedgerResult<Recipe> {
        let name = validate_name("name", &options.name)?;
        validate_composition(&options.ingredients)?;

        let composition = options.ingredients;
        let now = self.now();

        let recipe = self
            .db
            .atomic(move |unit| {
                Box::pin(async move {
                    let record = unit.recipes().insert(&name, now).await?;

                    let mut ingredients = Vec::with_capacity(composition.len());
                    for entry in composition {
                        let ingredient = unit
                            .ingredients()
                            .find(entry.ingredient_id)
                            .await?
                            .ok_or(ValidationError::UnknownIngredient {
                                ingredient_id: entry.ingredient_id,
                            })?;

                        unit.recipes()
                            .add_ingredient(record.id, entry.ingredient_id, entry.units)
                            .await?;

                        ingredients.push(RecipeIngredient {
                            ingredient,
                            units: entry.units,
                        });
                    }

                    Ok::<_, LedgerError>(Recipe {
                        id: record.id,
                        name: record.name,
                        ingredients,
                        created_at: record.created_at,
                        last_modified: record.last_modified,
                    })
                })
            })
            .await?;

        info!(
            id = recipe.id,
            name = %recipe.name,
            ingredients = recipe.ingredients.len(),
            "Recipe created"
        );
        Ok(recipe)
    }

    /// Records the sale of `sold_units` of a recipe, consuming its
    /// ingredients in one transaction.
    ///
    /// ## Returns
    /// * `Ok(SalesEntry)` - The persisted ledger row
    /// * `Err(LedgerError::BadOptions)` - `sold_units <= 0`
    /// * `Err(LedgerError::NotFound)` - Unknown recipe, or an ingredient of
    ///   its composition no longer exists; nothing persisted
    /// * `Err(LedgerError::InsufficientStock)` - Only under
    ///   `StockPolicy::RejectNegative`; nothing persisted
    pub async fn add_sales(&self, recipe_id: i64, sold_units: i64) -> LedgerResult<SalesEntry> {
        validate_units("units", sold_units)?;

        let policy = self.stock_policy;
        let now = self.now();

        let entry = self
            .db
            .atomic(move |unit| {
                Box::pin(async move {
                    if unit.recipes().find(recipe_id).await?.is_none() {
                        return Err(LedgerError::not_found("Recipe", recipe_id));
                    }

                    let composition = unit.recipes().find_composition(recipe_id).await?;

                    for entry in composition {
                        let consumed = entry.units.checked_mul(sold_units).ok_or_else(|| {
                            ValidationError::InvalidFormat {
                                field: "units".to_string(),
                                reason: "consumed quantity overflows".to_string(),
                            }
                        })?;

                        let level = unit
                            .ingredients()
                            .decrease_stock(entry.ingredient_id, consumed, now)
                            .await?;

                        if !policy.permits(level) {
                            warn!(
                                ingredient_id = entry.ingredient_id,
                                level = level,
                                "Sale rejected by stock policy"
                            );
                            return Err(LedgerError::InsufficientStock {
                                ingredient_id: entry.ingredient_id,
                                available: level + consumed,
                                requested: consumed,
                            });
                        }
                    }

                    let sale = unit.sales().append(recipe_id, sold_units, now).await?;
                    Ok::<_, LedgerError>(sale)
                })
            })
            .await?;

        info!(recipe_id = recipe_id, units = sold_units, "Sales recorded");
        Ok(entry)
    }

    /// Gets a recipe with its cost at current ingredient prices.
    pub async fn get_recipe_with_cost(&self, recipe_id: i64) -> LedgerResult<(RecipeView, f64)> {
        let mut session = self.db.session().await?;

        let view = session
            .recipe_views()
            .find(recipe_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Recipe", recipe_id))?;

        let cost = view.cost();
        Ok((view, cost))
    }

    /// Lists every recipe at current ingredient prices.
    pub async fn find_recipes(&self) -> LedgerResult<Vec<RecipeView>> {
        let mut session = self.db.session().await?;
        Ok(session.recipe_views().find_all().await?)
    }

    /// Sales of one recipe in insertion order.
    pub async fn sales_history(&self, recipe_id: i64) -> LedgerResult<Vec<SalesEntry>> {
        let mut session = self.db.session().await?;

        if session.recipes().find(recipe_id).await?.is_none() {
            return Err(LedgerError::not_found("Recipe", recipe_id));
        }

        Ok(session.sales().find_by_recipe(recipe_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
