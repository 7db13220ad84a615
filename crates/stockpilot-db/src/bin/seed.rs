//! # Seed Data Generator
//!
//! Populates the database with sample inventory data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p stockpilot-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockpilot-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p stockpilot-db --bin seed -- --db ./data/stockpilot.db
//! ```
//!
//! ## Generated Data
//! - A handful of suppliers and categories
//! - `count` products with SKU `{CATEGORY}-{INDEX}`, deterministic
//!   pseudo-random prices/costs/reorder levels
//! - An initial purchase movement per product plus a few sales, all routed
//!   through the ledger so every quantity matches its movement history

use std::env;

use stockpilot_core::{NewCategory, NewMovement, NewProduct, NewSupplier};
use stockpilot_db::{Database, DbConfig};

/// Category names with product name stems for realistic test data
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Cola 330ml",
            "Cola 500ml",
            "Orange Juice 1L",
            "Apple Juice 1L",
            "Sparkling Water",
            "Still Water",
            "Iced Tea",
            "Energy Drink",
            "Lemonade",
            "Cold Brew Coffee",
        ],
    ),
    (
        "Snacks",
        &[
            "Salted Chips",
            "Paprika Chips",
            "Tortilla Chips",
            "Chocolate Bar",
            "Peanut Bar",
            "Gummy Bears",
            "Cookies",
            "Crackers",
            "Pretzels",
            "Trail Mix",
        ],
    ),
    (
        "Pantry",
        &[
            "Spaghetti 500g",
            "Penne 500g",
            "White Rice 1kg",
            "Brown Rice 1kg",
            "Canned Beans",
            "Canned Corn",
            "Canned Tomatoes",
            "Olive Oil 500ml",
            "Flour 1kg",
            "Sugar 1kg",
        ],
    ),
    (
        "Household",
        &[
            "Dish Soap",
            "Laundry Detergent",
            "Paper Towels",
            "Trash Bags",
            "Sponges",
            "Glass Cleaner",
            "Hand Soap",
            "Aluminum Foil",
            "Light Bulbs",
            "Batteries AA",
        ],
    ),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Acme Wholesale", "orders@acme.example"),
    ("Baltic Imports", "sales@baltic.example"),
    ("Riverside Foods", "supply@riverside.example"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./stockpilot_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("StockPilot Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockpilot_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 StockPilot Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Suppliers
    let mut supplier_ids = Vec::new();
    for (name, email) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .insert(&NewSupplier {
                name: name.to_string(),
                email: Some(email.to_string()),
                phone: None,
                address: None,
            })
            .await?;
        supplier_ids.push(supplier.id);
    }
    println!("✓ Created {} suppliers", supplier_ids.len());

    // Categories
    let mut category_ids = Vec::new();
    for (name, _) in CATALOG {
        let category = db
            .categories()
            .insert(&NewCategory {
                name: name.to_string(),
            })
            .await?;
        category_ids.push(category.id);
    }
    println!("✓ Created {} categories", category_ids.len());

    // Products and movements
    println!();
    println!("Generating products...");

    let mut generated = 0usize;
    let start = std::time::Instant::now();

    'outer: for round in 0usize.. {
        for (category_idx, (_, names)) in CATALOG.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated;
                let sku = format!(
                    "{}-{:04}",
                    &CATALOG[category_idx].0[..3].to_uppercase(),
                    category_idx * 1000 + round * 100 + name_idx
                );

                // Deterministic pseudo-random pricing: cost $0.50-$8.49,
                // price marked up ~60%
                let cost = 0.50 + ((seed * 17) % 800) as f64 / 100.0;
                let price = (cost * 1.6 * 100.0).round() / 100.0;

                let product = db
                    .products()
                    .insert(&NewProduct {
                        sku,
                        name: if round == 0 {
                            name.to_string()
                        } else {
                            format!("{} (lot {})", name, round + 1)
                        },
                        description: None,
                        price,
                        cost,
                        reorder_level: (seed % 10) as i64,
                        is_active: true,
                        category_id: Some(category_ids[category_idx]),
                        supplier_id: Some(supplier_ids[seed % supplier_ids.len()]),
                    })
                    .await?;

                // Stock it through the ledger: one purchase, then a few
                // sales, so the quantity cache has a real audit trail.
                let initial = 20 + ((seed * 13) % 80) as i64;
                db.ledger()
                    .record(&NewMovement {
                        product_id: product.id,
                        change: initial,
                        reason: "purchase".to_string(),
                        reference: Some(format!("PO-{:05}", seed)),
                    })
                    .await?;

                let sales = (seed * 7) % 4;
                for sale in 0..sales {
                    db.ledger()
                        .record(&NewMovement {
                            product_id: product.id,
                            change: -(1 + ((seed + sale) % 5) as i64),
                            reason: "sale".to_string(),
                            reference: None,
                        })
                        .await?;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Quick sanity pass over the derived views
    println!();
    let valuation = db.analytics().stock_valuation().await?;
    println!(
        "  Valuation: {} units, cost {:.2}, retail {:.2}",
        valuation.total_quantity, valuation.cost_value, valuation.retail_value
    );

    let low = db.analytics().low_stock(None).await?;
    println!("  Low stock: {} products at/below reorder level", low.len());

    let movers = db.analytics().top_movers(30, 5).await?;
    println!("  Top mover: {:?}", movers.first().map(|m| &m.sku));

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
