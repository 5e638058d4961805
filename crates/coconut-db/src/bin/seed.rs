//! # Default Table Seeder
//!
//! Creates (or migrates) a database and fills empty rule tables with the
//! shipped defaults.
//!
//! ## Usage
//! ```bash
//! # Seed ./coconut_dev.db
//! cargo run -p coconut-db --bin coconut-seed
//!
//! # Specify database path
//! cargo run -p coconut-db --bin coconut-seed -- --db ./data/coconut.db
//! ```

use std::env;

use chrono::FixedOffset;
use coconut_core::delivery::{overlapping_quantity_rules, zone_consistency};
use coconut_db::{seed_defaults, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./coconut_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Coconut Admin Seed Data");
                println!();
                println!("Usage: coconut-seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./coconut_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🥥 Coconut Admin Seed Data");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let report = seed_defaults(&db).await?;
    if report.is_empty() {
        println!("⚠ Every table already has rows, nothing seeded.");
    } else {
        println!();
        println!("  Quantity rules:  {}", report.quantity_rules);
        println!("  Zone rules:      {}", report.zone_rules);
        println!("  Delivery zones:  {}", report.delivery_zones);
        println!("  Volume tiers:    {}", report.volume_tiers);
        println!("  Customer prices: {}", report.customer_prices);
        println!("  Price list:      {}", if report.price_list { "yes" } else { "kept" });
    }

    // Offsets don't depend on the time zone for these checks
    let rules = db.load_delivery_rules(FixedOffset::east_opt(0).ok_or("invalid offset")?).await?;

    println!();
    println!("Checking tables...");
    for (a, b) in overlapping_quantity_rules(rules.quantity_rules()) {
        println!("  ⚠ Quantity rules {} and {} overlap", a, b);
    }
    let zones = zone_consistency(rules.zone_rules(), rules.zones());
    for name in &zones.rules_without_fee {
        println!("  ⚠ Zone rule '{}' has no delivery fee", name);
    }
    for name in &zones.fees_without_rule {
        println!("  ⚠ Delivery zone '{}' has no cutoff rule", name);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
