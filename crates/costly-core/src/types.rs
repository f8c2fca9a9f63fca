//! # Domain Types
//!
//! Core domain types used throughout the ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Ingredient    │   │     Recipe      │   │   StockEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  ingredient_id  │       │
//! │  │  name (unique)  │◄──│  composition[]  │   │  units, price   │       │
//! │  │  unit, price    │   │  (ingredient,   │   │  (append-only)  │       │
//! │  │  units_in_stock │   │   units)        │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                              ┌─────────────────┐       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │   SalesEntry    │       │
//! │  │      Unit       │   │   RecipeView    │   │  ─────────────  │       │
//! │  │  gr kg L ml     │   │  live prices    │   │  recipe_id      │       │
//! │  │  units          │   │  → cost()       │   │  units sold     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted entity carries an `i64` id assigned by the store.
//! Ledger rows (`StockEntry`, `SalesEntry`) are never mutated once written.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cost::project_cost;
use crate::error::ValidationError;

// =============================================================================
// Unit
// =============================================================================

/// Measurement unit an ingredient is stocked and priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Unit {
    #[serde(rename = "gr")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "gr"))]
    Gram,
    #[serde(rename = "kg")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "kg"))]
    Kilogram,
    #[serde(rename = "L")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "L"))]
    Liter,
    #[serde(rename = "ml")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ml"))]
    Milliliter,
    #[serde(rename = "units")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "units"))]
    Units,
}

impl Unit {
    /// All supported units, in display order.
    pub const ALL: [Unit; 5] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Liter,
        Unit::Milliliter,
        Unit::Units,
    ];

    /// Returns the short code stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Gram => "gr",
            Unit::Kilogram => "kg",
            Unit::Liter => "L",
            Unit::Milliliter => "ml",
            Unit::Units => "units",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "unit".to_string(),
                reason: format!("'{}' is not one of gr, kg, L, ml, units", s),
            })
    }
}

// =============================================================================
// Ingredient
// =============================================================================

/// An ingredient with its current per-unit price and running stock counter.
///
/// `price` and `units_in_stock` are only changed by ledger operations
/// (stock additions and recipe sales), never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Ingredient {
    /// Store-assigned identifier.
    pub id: i64,

    /// Unique display name.
    pub name: String,

    /// Measurement unit.
    pub unit: Unit,

    /// Current per-unit cost (price of the most recent stock addition).
    pub price: f64,

    /// Running stock counter. May go negative under `StockPolicy::AllowNegative`.
    pub units_in_stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub last_modified: DateTime<Utc>,
}

/// Values needed to insert a new ingredient. Stock always starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient {
    pub name: String,
    pub unit: Unit,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Entry
// =============================================================================

/// One stock replenishment event. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockEntry {
    pub id: i64,
    pub ingredient_id: i64,
    pub units: i64,
    pub price: f64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Recipe
// =============================================================================

/// One line of a recipe composition as submitted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompositionEntry {
    pub ingredient_id: i64,
    /// Units of the ingredient consumed per recipe unit sold.
    pub units: i64,
}

/// A composition line resolved against the ingredient it references.
///
/// The ingredient is a snapshot taken while the recipe was created. It is
/// returned to the caller only; prices are never pinned to the recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub units: i64,
}

/// A recipe with its fixed composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub last_modified: DateTime<Utc>,
}

impl Recipe {
    /// Cost of the recipe using the ingredient snapshots it carries.
    pub fn cost(&self) -> f64 {
        project_cost(
            self.ingredients
                .iter()
                .map(|line| (line.ingredient.price, line.units)),
        )
    }

    /// Returns the composition without the ingredient snapshots.
    pub fn composition(&self) -> Vec<CompositionEntry> {
        self.ingredients
            .iter()
            .map(|line| CompositionEntry {
                ingredient_id: line.ingredient.id,
                units: line.units,
            })
            .collect()
    }
}

// =============================================================================
// Recipe View (read model)
// =============================================================================

/// A composition line joined with the ingredient's *current* values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeIngredientView {
    /// Ingredient id.
    pub id: i64,
    pub name: String,
    pub unit: Unit,
    /// Current ingredient price.
    pub price: f64,
    /// Units per recipe.
    pub units: i64,
}

/// Read model of a recipe used for cost display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeView {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<RecipeIngredientView>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub last_modified: DateTime<Utc>,
}

impl RecipeView {
    /// Cost at current ingredient prices. Recomputed on every call.
    pub fn cost(&self) -> f64 {
        project_cost(self.ingredients.iter().map(|line| (line.price, line.units)))
    }
}

// =============================================================================
// Sales Entry
// =============================================================================

/// One recipe sale event. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesEntry {
    pub id: i64,
    pub recipe_id: i64,
    /// Recipe units sold.
    pub units: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Policy
// =============================================================================

/// What a sale may do to a stock counter that would drop below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockPolicy {
    /// Overselling is allowed; the counter goes negative.
    #[default]
    AllowNegative,
    /// A sale that would leave any ingredient below zero is rejected.
    RejectNegative,
}

impl StockPolicy {
    /// Returns true if `units_in_stock` is an acceptable level after a sale.
    pub const fn permits(&self, units_in_stock: i64) -> bool {
        match self {
            StockPolicy::AllowNegative => true,
            StockPolicy::RejectNegative => units_in_stock >= 0,
        }
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow-negative" => Ok(StockPolicy::AllowNegative),
            "reject-negative" => Ok(StockPolicy::RejectNegative),
            other => Err(ValidationError::InvalidFormat {
                field: "stock policy".to_string(),
                reason: format!("'{}' is not allow-negative or reject-negative", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: i64, price: f64) -> Ingredient {
        let now = Utc::now();
        Ingredient {
            id,
            name: format!("ingredient-{}", id),
            unit: Unit::Gram,
            price,
            units_in_stock: 0,
            created_at: now,
            last_modified: now,
        }
    }

    #[test]
    fn test_unit_round_trips_through_str() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
        }
        assert!("pounds".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_serializes_as_short_code() {
        assert_eq!(serde_json::to_string(&Unit::Gram).unwrap(), "\"gr\"");
        assert_eq!(serde_json::to_string(&Unit::Liter).unwrap(), "\"L\"");
    }

    #[test]
    fn test_recipe_cost_uses_snapshot_prices() {
        let now = Utc::now();
        let recipe = Recipe {
            id: 1,
            name: "stew".to_string(),
            ingredients: vec![
                RecipeIngredient {
                    ingredient: ingredient(1, 1.0),
                    units: 2,
                },
                RecipeIngredient {
                    ingredient: ingredient(2, 0.5),
                    units: 3,
                },
            ],
            created_at: now,
            last_modified: now,
        };

        assert_eq!(recipe.cost(), 3.5);
        assert_eq!(
            recipe.composition(),
            vec![
                CompositionEntry {
                    ingredient_id: 1,
                    units: 2
                },
                CompositionEntry {
                    ingredient_id: 2,
                    units: 3
                },
            ]
        );
    }

    #[test]
    fn test_stock_policy() {
        assert!(StockPolicy::AllowNegative.permits(-10));
        assert!(StockPolicy::RejectNegative.permits(0));
        assert!(!StockPolicy::RejectNegative.permits(-1));
        assert_eq!(StockPolicy::default(), StockPolicy::AllowNegative);
        assert_eq!(
            "reject-negative".parse::<StockPolicy>().unwrap(),
            StockPolicy::RejectNegative
        );
        assert!("clamp".parse::<StockPolicy>().is_err());
    }
}
