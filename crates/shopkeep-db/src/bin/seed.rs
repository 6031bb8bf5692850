//! # Seed Data Generator
//!
//! Populates a database with sample clothing items for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./store_dev.db with the built-in catalog
//! cargo run -p shopkeep-db --bin seed
//!
//! # Also record sample sales over the last few months
//! cargo run -p shopkeep-db --bin seed -- --sales 40
//!
//! # Seed from a JSON file of {name, price, quantity} rows instead
//! cargo run -p shopkeep-db --bin seed -- --items ./items.json --db ./data/store.db
//! ```
//!
//! The built-in catalog crosses garments with colours, e.g. "Linen Shirt
//! Navy". Items go in through the same all-or-nothing batch add the CLI
//! uses, so a bad row seeds nothing.

use std::env;

use chrono::{Duration, Local};
use shopkeep_core::{ItemDraft, NewSale, SaleLine};
use shopkeep_db::{Database, DbConfig};

/// Garments with base prices (major units, as typed by an operator).
const GARMENTS: &[(&str, &str)] = &[
    ("Linen Shirt", "24.50"),
    ("Oxford Shirt", "32"),
    ("T-Shirt", "9.99"),
    ("Polo", "18"),
    ("Chinos", "35"),
    ("Jeans", "42.75"),
    ("Hoodie", "38"),
    ("Cardigan", "44"),
    ("Scarf", "12.50"),
    ("Beanie", "8"),
    ("Cap", "11"),
    ("Belt", "15.25"),
    ("Socks 3-Pack", "7.50"),
    ("Rain Jacket", "65"),
];

const COLOURS: &[&str] = &["Black", "White", "Navy", "Olive", "Grey"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./store_dev.db");
    let mut items_file: Option<String> = None;
    let mut sales: usize = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--items" | "-i" => {
                if i + 1 < args.len() {
                    items_file = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shopkeep Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./store_dev.db)");
                println!("  -i, --items <FILE>   JSON array of {{name, price, quantity}} rows");
                println!("  -s, --sales <N>      Also record N sample sales (default: 0)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Shopkeep Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let drafts = match &items_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<Vec<ItemDraft>>(&text)?
        }
        None => built_in_catalog(),
    };

    let added = db.items().add_batch(&drafts).await?;
    println!("✓ Added {} items", added.len());

    if sales > 0 {
        let recorded = record_sample_sales(&db, &added, sales).await?;
        println!("✓ Recorded {} sample sales", recorded);
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");
    Ok(())
}

/// Every garment in every colour, with a deterministic stock level.
fn built_in_catalog() -> Vec<ItemDraft> {
    let mut drafts = Vec::with_capacity(GARMENTS.len() * COLOURS.len());

    for (g, (garment, price)) in GARMENTS.iter().enumerate() {
        for (c, colour) in COLOURS.iter().enumerate() {
            let quantity = 3 + (g * 7 + c * 3) % 20;
            drafts.push(ItemDraft::new(
                format!("{garment} {colour}"),
                *price,
                quantity.to_string(),
            ));
        }
    }

    drafts
}

/// Records `count` ledger entries spread over the last ~120 days.
///
/// These go straight to the ledger; catalog stock is left untouched.
async fn record_sample_sales(
    db: &Database,
    items: &[shopkeep_core::Item],
    count: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    if items.is_empty() {
        return Ok(0);
    }

    let now = Local::now().naive_local();

    for n in 0..count {
        let days_ago = i64::try_from((n * 37) % 120)?;
        let minutes = i64::try_from((n * 53) % 600)?;
        let at = now - Duration::days(days_ago) - Duration::minutes(minutes);

        let lines: Vec<SaleLine> = (0..1 + n % 3)
            .map(|k| {
                let item = &items[(n * 5 + k * 11) % items.len()];
                SaleLine {
                    item_id: Some(item.id),
                    item_name: item.name.clone(),
                    quantity: 1 + i64::try_from((n + k) % 3).unwrap_or(0),
                    unit_price: item.price,
                }
            })
            .collect();

        db.sales().record_sale(&NewSale::from_lines(at, lines)).await?;
    }

    Ok(count)
}
