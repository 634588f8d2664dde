//! # Seed Data Generator
//!
//! Populates the database with catalog products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalog
//! cargo run -p caderno-db --bin seed
//!
//! # Limit the number of products
//! cargo run -p caderno-db --bin seed -- --count 20
//!
//! # Specify database path
//! cargo run -p caderno-db --bin seed -- --db ./data/caderno.db
//! ```

use std::env;

use caderno_db::{Database, DbConfig, NewProduct};

/// Base catalog: (name, unit price in centavos).
const CATALOG: &[(&str, i64)] = &[
    ("parafuso", 15),
    ("porca", 10),
    ("arruela", 5),
    ("prego", 8),
    ("bucha 6mm", 12),
    ("bucha 8mm", 18),
    ("abraçadeira", 45),
    ("fita isolante", 350),
    ("fita crepe", 420),
    ("lixa 120", 180),
    ("lixa 220", 180),
    ("trena 3m", 1250),
    ("martelo", 2890),
    ("chave de fenda", 1590),
    ("chave philips", 1590),
    ("alicate", 2450),
    ("cadeado 30mm", 1780),
    ("dobradiça", 650),
    ("fechadura", 4590),
    ("silicone acético", 1890),
];

/// Stock variants applied per catalog pass.
const STOCK_LEVELS: &[i64] = &[100, 50, 25, 200, 80];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = CATALOG.len();
    let mut db_path = String::from("./caderno_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(CATALOG.len());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caderno Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to insert (default: whole catalog)");
                println!("  -d, --db <PATH>    Database file path (default: ./caderno_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Caderno Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().stats().await?.product_count;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Inserting products...");

    let mut inserted = 0;
    for (idx, (name, price_cents)) in CATALOG.iter().cycle().take(count).enumerate() {
        let stock = STOCK_LEVELS[idx % STOCK_LEVELS.len()];
        let name = if idx < CATALOG.len() {
            name.to_string()
        } else {
            // Beyond one catalog pass, disambiguate names.
            format!("{} ({})", name, idx / CATALOG.len() + 1)
        };

        db.products()
            .insert(NewProduct {
                name,
                price_cents: *price_cents,
                stock_quantity: stock,
            })
            .await?;
        inserted += 1;
    }

    println!("✓ Inserted {} products", inserted);

    let stats = db.products().stats().await?;
    println!("  Catalog: {} products, {} units in stock", stats.product_count, stats.units_in_stock);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
