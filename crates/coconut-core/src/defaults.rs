//! # Default Tables
//!
//! The rule tables a fresh install starts with. `coconut-db` seeds these into
//! an empty database; tests use them as fixtures.
//!
//! ```text
//! Quantity rules          Zone rules (cutoff → before / after)
//! ──────────────          ────────────────────────────────────
//!   1-100  → 1 day        Zone A - Miami Beach   14:00 → 1 / 2
//! 101-200  → 2 days       Zone B - Downtown      12:00 → 1 / 2
//! 201-300  → 3 days       Zone C - Airport Area  15:00 → 1 / 2
//!
//! Delivery zones          Volume tiers
//! ──────────────          ────────────
//! Zone A - Miami Beach  $5.00     1-100    0%
//! Zone B - Downtown     $7.50   101-200    5%
//! Zone C - Suburbs     $10.00   201-500   10%
//!                               501+     15%
//! ```
//!
//! The third zone is named differently in the two zone tables. That is how
//! the shipped data looks; [`crate::delivery::zone_consistency`] reports it.

use chrono::{FixedOffset, NaiveTime};

use crate::delivery::DeliveryRules;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{
    CustomerPrice, DeliveryZone, PriceList, QuantityRule, RuleStatus, UnitType, VolumeTier,
    ZoneRule,
};

pub fn quantity_rules() -> Vec<QuantityRule> {
    [(1, 100, 1), (101, 200, 2), (201, 300, 3)]
        .into_iter()
        .enumerate()
        .map(|(i, (min_qty, max_qty, days))| QuantityRule {
            id: format!("qty-{}", i + 1),
            min_qty,
            max_qty,
            delivery_offset_days: days,
            status: RuleStatus::Active,
        })
        .collect()
}

pub fn zone_rules() -> Vec<ZoneRule> {
    [
        ("Zone A - Miami Beach", 14),
        ("Zone B - Downtown", 12),
        ("Zone C - Airport Area", 15),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, hour))| ZoneRule {
        id: format!("zone-rule-{}", i + 1),
        zone_name: name.to_string(),
        cutoff_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN),
        before_cutoff_offset_days: 1,
        after_cutoff_offset_days: 2,
        status: RuleStatus::Active,
    })
    .collect()
}

pub fn delivery_zones() -> Vec<DeliveryZone> {
    [
        ("Zone A - Miami Beach", 500, "Beachfront hotels and residences"),
        ("Zone B - Downtown", 750, "Brickell and downtown Miami"),
        ("Zone C - Suburbs", 1000, "Residential areas outside the city center"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, cents, description))| DeliveryZone {
        id: format!("zone-{}", i + 1),
        name: name.to_string(),
        fee: Money::from_cents(cents),
        description: Some(description.to_string()),
        status: RuleStatus::Active,
    })
    .collect()
}

pub fn volume_tiers() -> Vec<VolumeTier> {
    [(1, 100, 0), (101, 200, 500), (201, 500, 1000), (501, 999_999, 1500)]
        .into_iter()
        .enumerate()
        .map(|(i, (min_qty, max_qty, discount_bps))| VolumeTier {
            id: format!("tier-{}", i + 1),
            min_qty,
            max_qty,
            discount_bps,
        })
        .collect()
}

pub fn price_list() -> PriceList {
    PriceList {
        case_price: Money::from_cents(7500),
        unit_price: Money::from_cents(50),
    }
}

pub fn customer_prices() -> Vec<CustomerPrice> {
    vec![
        CustomerPrice {
            id: "customer-1".to_string(),
            customer_name: "Hilton Hotel Miami".to_string(),
            custom_price: Money::from_cents(450),
            unit_type: UnitType::Unit,
        },
        CustomerPrice {
            id: "customer-2".to_string(),
            customer_name: "Paradise Events".to_string(),
            custom_price: Money::from_cents(7500),
            unit_type: UnitType::Case,
        },
    ]
}

/// The default delivery tables as a rule set in the given time zone.
pub fn delivery_rules(timezone: FixedOffset) -> CoreResult<DeliveryRules> {
    DeliveryRules::new(quantity_rules(), zone_rules(), delivery_zones(), timezone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_customer_price, validate_volume_tiers};

    #[test]
    fn test_default_tables_are_valid() {
        assert!(delivery_rules(FixedOffset::east_opt(0).unwrap()).is_ok());
        assert!(validate_volume_tiers(&volume_tiers()).is_empty());
        for price in customer_prices() {
            assert!(validate_customer_price(&price).is_empty());
        }
    }

    #[test]
    fn test_zone_rule_cutoffs() {
        let rules = zone_rules();
        assert_eq!(rules[0].cutoff_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(rules[1].cutoff_time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(rules[2].cutoff_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<String> = quantity_rules().into_iter().map(|r| r.id).collect();
        ids.extend(zone_rules().into_iter().map(|r| r.id));
        ids.extend(delivery_zones().into_iter().map(|z| z.id));
        let len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }
}
