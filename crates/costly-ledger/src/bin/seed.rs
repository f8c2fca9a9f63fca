//! # Seed Data Generator
//!
//! Populates a development database with ingredients, stock, recipes and
//! sales, then prints every recipe with its current cost.
//!
//! ## Usage
//! ```bash
//! # Seed ./costly.db (or COSTLY_DATABASE_PATH)
//! cargo run -p costly-ledger --bin seed
//!
//! # Specify database path
//! cargo run -p costly-ledger --bin seed -- --db ./data/costly.db
//!
//! # Print the recipe costs as JSON
//! cargo run -p costly-ledger --bin seed -- --json
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info,costly=debug,sqlx=warn`).

use std::env;

use costly_core::{CompositionEntry, Unit};
use costly_ledger::{
    CreateIngredientOptions, CreateRecipeOptions, Ledger, LedgerConfig, StockOptions,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// (name, unit, price, initial stock)
const INGREDIENTS: &[(&str, Unit, f64, i64)] = &[
    ("Beef", Unit::Gram, 0.012, 20_000),
    ("Onion", Unit::Units, 0.30, 200),
    ("Carrot", Unit::Units, 0.15, 300),
    ("Potato", Unit::Kilogram, 1.10, 50),
    ("Olive Oil", Unit::Milliliter, 0.009, 5_000),
    ("Salt", Unit::Gram, 0.001, 10_000),
    ("Flour", Unit::Gram, 0.0015, 25_000),
    ("Milk", Unit::Liter, 0.95, 40),
    ("Egg", Unit::Units, 0.22, 360),
    ("Butter", Unit::Gram, 0.008, 4_000),
];

/// (name, [(ingredient index, units)])
const RECIPES: &[(&str, &[(usize, i64)])] = &[
    ("Beef Stew", &[(0, 250), (1, 1), (2, 2), (3, 1), (5, 5)]),
    ("Pancakes", &[(6, 200), (7, 1), (8, 2), (9, 20), (5, 1)]),
    ("Roast Potatoes", &[(3, 1), (4, 30), (5, 3)]),
    ("Omelette", &[(8, 3), (9, 10), (1, 1), (5, 2)]),
];

/// (recipe index, units sold)
const SALES: &[(usize, i64)] = &[(0, 12), (1, 30), (2, 8), (3, 15), (0, 5), (1, 10)];

#[derive(Serialize)]
struct RecipeCostLine {
    id: i64,
    name: String,
    cost: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,costly=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = LedgerConfig::from_env()?;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Costly Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./costly.db)");
                println!("      --json         Print recipe costs as JSON");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Costly Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!();

    let ledger = Ledger::connect(&config).await?;

    let (total, applied) = ledger.database().migration_status().await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let existing = ledger.find_ingredients().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} ingredients", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Creating ingredients...");

    let mut ingredient_ids = Vec::with_capacity(INGREDIENTS.len());
    for (name, unit, price, stock) in INGREDIENTS {
        let ingredient = ledger
            .create_ingredient(CreateIngredientOptions {
                name: name.to_string(),
                unit: *unit,
                price: *price,
            })
            .await?;

        ledger
            .add_stock(
                ingredient.id,
                StockOptions {
                    units: *stock,
                    price: *price,
                },
            )
            .await?;

        ingredient_ids.push(ingredient.id);
    }
    println!("  ✓ {} ingredients stocked", ingredient_ids.len());

    println!("Creating recipes...");

    let mut recipe_ids = Vec::with_capacity(RECIPES.len());
    for (name, lines) in RECIPES {
        let ingredients = lines
            .iter()
            .map(|(index, units)| CompositionEntry {
                ingredient_id: ingredient_ids[*index],
                units: *units,
            })
            .collect();

        let recipe = ledger
            .create_recipe(CreateRecipeOptions {
                name: name.to_string(),
                ingredients,
            })
            .await?;

        recipe_ids.push(recipe.id);
    }
    println!("  ✓ {} recipes", recipe_ids.len());

    println!("Recording sales...");

    let mut recorded = 0;
    for (index, units) in SALES {
        match ledger.add_sales(recipe_ids[*index], *units).await {
            Ok(_) => recorded += 1,
            Err(e) => eprintln!("Failed to record sale of recipe {}: {}", recipe_ids[*index], e),
        }
    }
    println!("  ✓ {} of {} sales", recorded, SALES.len());

    println!();

    let lines: Vec<RecipeCostLine> = ledger
        .find_recipes()
        .await?
        .into_iter()
        .map(|view| RecipeCostLine {
            id: view.id,
            cost: view.cost(),
            name: view.name,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        println!("Recipe costs at current prices:");
        for line in &lines {
            println!("  #{:<3} {:<16} {:>8.2}", line.id, line.name, line.cost);
        }

        println!();
        println!("Stock levels:");
        for ingredient in ledger.find_ingredients().await? {
            println!(
                "  {:<12} {:>8} {}",
                ingredient.name, ingredient.units_in_stock, ingredient.unit
            );
        }
    }

    ledger.database().close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
