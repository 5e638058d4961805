//! # Repository Module
//!
//! Database repository implementations for the rule tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  DeliveryService                                                       │
//! │       │                                                                 │
//! │       │  db.zone_rules().update(&rule)                                 │
//! │       ▼                                                                 │
//! │  ZoneRuleRepository                                                    │
//! │  ├── list(&self)            rows in table order                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, rule)                                               │
//! │  ├── update(&self, rule)                                               │
//! │  ├── delete(&self, id)                                                 │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query → *Row (FromRow) → core type                        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into private `*Row` structs that mirror the columns and
//! then converted into `coconut-core` types, so a bad stored value surfaces as
//! [`DbError::CorruptRow`] instead of a panic.
//!
//! ## Available Repositories
//!
//! - [`QuantityRuleRepository`](quantity_rule::QuantityRuleRepository)
//! - [`ZoneRuleRepository`](zone_rule::ZoneRuleRepository)
//! - [`DeliveryZoneRepository`](delivery_zone::DeliveryZoneRepository)
//! - [`VolumeTierRepository`](pricing::VolumeTierRepository),
//!   [`CustomerPriceRepository`](pricing::CustomerPriceRepository),
//!   [`PriceListRepository`](pricing::PriceListRepository)

use uuid::Uuid;

use crate::error::{DbError, DbResult};

pub mod delivery_zone;
pub mod pricing;
pub mod quantity_rule;
pub mod zone_rule;

/// Generates a new row ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Narrows a stored INTEGER column to `u32`.
pub(crate) fn column_u32(
    table: &'static str,
    id: &str,
    column: &str,
    value: i64,
) -> DbResult<u32> {
    u32::try_from(value)
        .map_err(|_| DbError::corrupt(table, id, format!("{} out of range: {}", column, value)))
}
