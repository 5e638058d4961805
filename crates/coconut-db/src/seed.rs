//! # Default Data Seeding
//!
//! Fills empty tables with the tables from [`coconut_core::defaults`].
//!
//! ```text
//! table            empty?   action
//! ───────────────  ───────  ─────────────────────────────
//! quantity_rules   yes      insert 3 default rules
//! zone_rules       no       leave as is
//! delivery_zones   yes      insert 3 default zones
//! ...
//! ```
//!
//! Each table is checked on its own; a table that already has rows is left
//! untouched.

use tracing::info;

use coconut_core::defaults;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::generate_id;

/// Rows inserted per table by [`seed_defaults`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub quantity_rules: usize,
    pub zone_rules: usize,
    pub delivery_zones: usize,
    pub volume_tiers: usize,
    pub customer_prices: usize,
    pub price_list: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == SeedReport::default()
    }
}

/// Inserts the default tables into every table that is still empty.
pub async fn seed_defaults(db: &Database) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    if db.quantity_rules().count().await? == 0 {
        for mut rule in defaults::quantity_rules() {
            rule.id = generate_id();
            db.quantity_rules().insert(&rule).await?;
            report.quantity_rules += 1;
        }
    }

    if db.zone_rules().count().await? == 0 {
        for mut rule in defaults::zone_rules() {
            rule.id = generate_id();
            db.zone_rules().insert(&rule).await?;
            report.zone_rules += 1;
        }
    }

    if db.delivery_zones().count().await? == 0 {
        for mut zone in defaults::delivery_zones() {
            zone.id = generate_id();
            db.delivery_zones().insert(&zone).await?;
            report.delivery_zones += 1;
        }
    }

    if db.volume_tiers().count().await? == 0 {
        for mut tier in defaults::volume_tiers() {
            tier.id = generate_id();
            db.volume_tiers().insert(&tier).await?;
            report.volume_tiers += 1;
        }
    }

    if db.customer_prices().count().await? == 0 {
        for mut price in defaults::customer_prices() {
            price.id = generate_id();
            db.customer_prices().insert(&price).await?;
            report.customer_prices += 1;
        }
    }

    if db.price_list().get().await?.is_none() {
        db.price_list().set(&defaults::price_list()).await?;
        report.price_list = true;
    }

    info!(?report, "Seeded default tables");
    Ok(report)
}
