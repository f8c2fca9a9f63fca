//! # Ingredient Operations
//!
//! Ingredient lifecycle and stock replenishment.
//!
//! ## AddStock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_stock(ingredient_id, units, price)                                 │
//! │                                                                         │
//! │  validate units > 0, price > 0          ── BadOptions                   │
//! │  BEGIN                                                                  │
//! │   1. INSERT stock_history (units, price, now)                           │
//! │   2. UPDATE ingredient SET units_in_stock += units, price = price       │
//! │   3. no row updated                     ── NotFound ── ROLLBACK (1)     │
//! │  COMMIT                                 ── StockEntry                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use costly_core::validation::{validate_name, validate_price, validate_units};
use costly_core::{Ingredient, NewIngredient, StockEntry, Unit};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

/// Options for [`Ledger::create_ingredient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIngredientOptions {
    pub name: String,
    pub unit: Unit,
    /// Initial per-unit price.
    pub price: f64,
}

/// Options for [`Ledger::edit_ingredient`].
///
/// Price and stock are absent: only ledger operations move them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditIngredientOptions {
    pub name: String,
    pub unit: Unit,
}

/// Options for [`Ledger::add_stock`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockOptions {
    pub units: i64,
    /// Per-unit price paid; becomes the ingredient's current price.
    pub price: f64,
}

impl Ledger {
    /// Creates an ingredient with zero stock.
    ///
    /// ## Returns
    /// * `Err(LedgerError::BadOptions)` - Empty name or invalid price
    /// * `Err(LedgerError::Storage)` - Name already taken
    pub async fn create_ingredient(
        &self,
        options: CreateIngredientOptions,
    ) -> LedgerResult<Ingredient> {
        let name = validate_name("name", &options.name)?;
        validate_price(options.price)?;

        let new = NewIngredient {
            name,
            unit: options.unit,
            price: options.price,
            created_at: self.now(),
        };

        let mut session = self.db.session().await?;
        let ingredient = session.ingredients().insert(&new).await?;

        info!(id = ingredient.id, name = %ingredient.name, "Ingredient created");
        Ok(ingredient)
    }

    /// Renames an ingredient or changes its unit.
    pub async fn edit_ingredient(
        &self,
        id: i64,
        options: EditIngredientOptions,
    ) -> LedgerResult<Ingredient> {
        let name = validate_name("name", &options.name)?;

        let mut session = self.db.session().await?;
        let ingredient = session
            .ingredients()
            .update_details(id, &name, options.unit, self.now())
            .await?;

        info!(id = ingredient.id, name = %ingredient.name, "Ingredient edited");
        Ok(ingredient)
    }

    /// Gets one ingredient.
    pub async fn find_ingredient(&self, id: i64) -> LedgerResult<Ingredient> {
        let mut session = self.db.session().await?;

        session
            .ingredients()
            .find(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Ingredient", id))
    }

    /// Lists every ingredient.
    pub async fn find_ingredients(&self) -> LedgerResult<Vec<Ingredient>> {
        let mut session = self.db.session().await?;
        Ok(session.ingredients().find_all().await?)
    }

    /// Records a stock replenishment and moves the ingredient's counter and
    /// price in one transaction.
    ///
    /// ## Returns
    /// * `Ok(StockEntry)` - The persisted ledger row
    /// * `Err(LedgerError::BadOptions)` - Non-positive units or price
    /// * `Err(LedgerError::NotFound)` - Unknown ingredient, nothing persisted
    pub async fn add_stock(&self, ingredient_id: i64, options: StockOptions) -> LedgerResult<StockEntry> {
        validate_units("units", options.units)?;
        validate_price(options.price)?;

        let StockOptions { units, price } = options;
        let now = self.now();

        let entry = self
            .db
            .atomic(move |unit| {
                Box::pin(async move {
                    let entry = unit.stock().append(ingredient_id, units, price, now).await?;
                    unit.ingredients()
                        .increase_stock(ingredient_id, units, price, now)
                        .await?;
                    Ok::<_, LedgerError>(entry)
                })
            })
            .await?;

        info!(
            ingredient_id = ingredient_id,
            units = units,
            price = price,
            "Stock added"
        );
        Ok(entry)
    }

    /// Stock additions of one ingredient in insertion order.
    pub async fn stock_history(&self, ingredient_id: i64) -> LedgerResult<Vec<StockEntry>> {
        let mut session = self.db.session().await?;

        if session.ingredients().find(ingredient_id).await?.is_none() {
            return Err(LedgerError::not_found("Ingredient", ingredient_id));
        }

        Ok(session.stock().find_by_ingredient(ingredient_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ledger::testing::{fixed_time, ledger};
    use costly_core::ValidationError;
    use costly_db::DbError;

    fn meat() -> CreateIngredientOptions {
        CreateIngredientOptions {
            name: "meat".to_string(),
            unit: Unit::Gram,
            price: 1.0,
        }
    }

    #[tokio::test]
    async fn test_create_ingredient_starts_empty() {
        let ledger = ledger().await;

        let meat = ledger.create_ingredient(meat()).await.unwrap();

        assert_eq!(meat.units_in_stock, 0);
        assert_eq!(meat.price, 1.0);
        assert_eq!(meat.created_at, fixed_time());
        assert_eq!(ledger.find_ingredient(meat.id).await.unwrap(), meat);
    }

    #[tokio::test]
    async fn test_create_ingredient_rejects_bad_options() {
        let ledger = ledger().await;

        let err = ledger
            .create_ingredient(CreateIngredientOptions {
                name: "  ".to_string(),
                ..meat()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadOptions);

        let err = ledger
            .create_ingredient(CreateIngredientOptions { price: 0.0, ..meat() })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::BadOptions(ValidationError::MustBePositive { .. })
        ));

        assert!(ledger.find_ingredients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ingredient_name_is_storage_error() {
        let ledger = ledger().await;

        ledger.create_ingredient(meat()).await.unwrap();
        let err = ledger.create_ingredient(meat()).await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Storage(DbError::UniqueViolation { .. })
        ));
        assert_eq!(ledger.find_ingredients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_stock_updates_counter_and_price() {
        let ledger = ledger().await;
        let meat = ledger.create_ingredient(meat()).await.unwrap();

        let entry = ledger
            .add_stock(meat.id, StockOptions { units: 500, price: 1.0 })
            .await
            .unwrap();
        assert_eq!(entry.units, 500);
        assert_eq!(entry.ingredient_id, meat.id);

        let meat = ledger.find_ingredient(meat.id).await.unwrap();
        assert_eq!(meat.units_in_stock, 500);
        assert_eq!(meat.price, 1.0);

        ledger
            .add_stock(meat.id, StockOptions { units: 20, price: 1.25 })
            .await
            .unwrap();

        let meat = ledger.find_ingredient(meat.id).await.unwrap();
        assert_eq!(meat.units_in_stock, 520);
        assert_eq!(meat.price, 1.25);

        let history = ledger.stock_history(meat.id).await.unwrap();
        let prices: Vec<f64> = history.iter().map(|entry| entry.price).collect();
        assert_eq!(prices, vec![1.0, 1.25]);
    }

    #[tokio::test]
    async fn test_add_stock_unknown_ingredient_persists_nothing() {
        let ledger = ledger().await;

        let err = ledger
            .add_stock(404, StockOptions { units: 5, price: 1.0 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let mut session = ledger.database().session().await.unwrap();
        assert_eq!(session.stock().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_stock_rejects_bad_options() {
        let ledger = ledger().await;
        let meat = ledger.create_ingredient(meat()).await.unwrap();

        for options in [
            StockOptions { units: 0, price: 1.0 },
            StockOptions { units: -3, price: 1.0 },
            StockOptions { units: 5, price: 0.0 },
            StockOptions { units: 5, price: f64::NAN },
        ] {
            let err = ledger.add_stock(meat.id, options).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadOptions);
        }

        assert!(ledger.stock_history(meat.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_ingredient_keeps_price_and_stock() {
        let ledger = ledger().await;
        let meat = ledger.create_ingredient(meat()).await.unwrap();
        ledger
            .add_stock(meat.id, StockOptions { units: 10, price: 2.0 })
            .await
            .unwrap();

        let edited = ledger
            .edit_ingredient(
                meat.id,
                EditIngredientOptions {
                    name: "beef".to_string(),
                    unit: Unit::Kilogram,
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.name, "beef");
        assert_eq!(edited.unit, Unit::Kilogram);
        assert_eq!(edited.price, 2.0);
        assert_eq!(edited.units_in_stock, 10);

        let err = ledger
            .edit_ingredient(
                404,
                EditIngredientOptions {
                    name: "ghost".to_string(),
                    unit: Unit::Gram,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_stock_history_of_unknown_ingredient() {
        let ledger = ledger().await;
        let err = ledger.stock_history(404).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
