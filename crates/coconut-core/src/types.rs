//! # Domain Types
//!
//! Rule records behind the delivery-rules and pricing screens.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Delivery timing                    Delivery cost                       │
//! │  ───────────────                    ─────────────                       │
//! │  QuantityRule  qty range → days     DeliveryZone  zone name → fee       │
//! │  ZoneRule      zone + cutoff → days                                     │
//! │                                                                         │
//! │  Product pricing                                                        │
//! │  ───────────────                                                        │
//! │  VolumeTier    qty range → discount                                     │
//! │  CustomerPrice customer → custom price per case or unit                 │
//! │  PriceList     default case / unit price                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ZoneRule::zone_name` and `DeliveryZone::name` are linked by convention
//! only; see [`crate::delivery::zone_consistency`].

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rule Status
// =============================================================================

/// Whether a rule participates in evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    #[default]
    Active,
    Inactive,
}

impl RuleStatus {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, RuleStatus::Active)
    }
}

// =============================================================================
// Quantity Rule
// =============================================================================

/// Delivery offset for orders whose quantity falls in `[min_qty, max_qty]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityRule {
    pub id: String,
    pub min_qty: u32,
    pub max_qty: u32,
    /// Days from submission until promised delivery.
    pub delivery_offset_days: u32,
    pub status: RuleStatus,
}

impl QuantityRule {
    /// Inclusive on both ends.
    #[inline]
    pub fn covers(&self, quantity: u32) -> bool {
        self.min_qty <= quantity && quantity <= self.max_qty
    }

    /// True if the two ranges share at least one quantity.
    pub fn overlaps(&self, other: &QuantityRule) -> bool {
        self.min_qty <= other.max_qty && other.min_qty <= self.max_qty
    }
}

// =============================================================================
// Zone Rule
// =============================================================================

/// Cutoff-based delivery timing for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ZoneRule {
    pub id: String,
    pub zone_name: String,
    /// Local time of day; orders at or after it get the later offset.
    #[serde(with = "crate::schedule::hhmm")]
    #[ts(as = "String")]
    pub cutoff_time: NaiveTime,
    pub before_cutoff_offset_days: u32,
    pub after_cutoff_offset_days: u32,
    pub status: RuleStatus,
}

impl ZoneRule {
    /// Offset for an order submitted at the given local time of day.
    #[inline]
    pub fn offset_for(&self, local_time: NaiveTime) -> u32 {
        if local_time < self.cutoff_time {
            self.before_cutoff_offset_days
        } else {
            self.after_cutoff_offset_days
        }
    }
}

// =============================================================================
// Delivery Zone
// =============================================================================

/// A named delivery area and the fee charged for delivering there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryZone {
    pub id: String,
    pub name: String,
    pub fee: Money,
    pub description: Option<String>,
    pub status: RuleStatus,
}

// =============================================================================
// Pricing
// =============================================================================

/// Unit a price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Case,
    Unit,
}

/// Percentage discount for order quantities in `[min_qty, max_qty]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VolumeTier {
    pub id: String,
    pub min_qty: u32,
    pub max_qty: u32,
    /// 500 = 5%.
    pub discount_bps: u32,
}

impl VolumeTier {
    #[inline]
    pub fn covers(&self, quantity: u32) -> bool {
        self.min_qty <= quantity && quantity <= self.max_qty
    }
}

/// A negotiated price that replaces the list price for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerPrice {
    pub id: String,
    pub customer_name: String,
    pub custom_price: Money,
    pub unit_type: UnitType,
}

/// Default prices for customers without a negotiated price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceList {
    pub case_price: Money,
    pub unit_price: Money,
}

impl PriceList {
    pub fn price_for(&self, unit_type: UnitType) -> Money {
        match unit_type {
            UnitType::Case => self.case_price,
            UnitType::Unit => self.unit_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn qty_rule(min: u32, max: u32) -> QuantityRule {
        QuantityRule {
            id: format!("{}-{}", min, max),
            min_qty: min,
            max_qty: max,
            delivery_offset_days: 1,
            status: RuleStatus::Active,
        }
    }

    #[test]
    fn test_quantity_rule_covers_inclusive() {
        let rule = qty_rule(101, 200);
        assert!(rule.covers(101));
        assert!(rule.covers(200));
        assert!(!rule.covers(100));
        assert!(!rule.covers(201));
    }

    #[test]
    fn test_quantity_rule_overlaps() {
        assert!(qty_rule(1, 100).overlaps(&qty_rule(100, 200)));
        assert!(qty_rule(50, 60).overlaps(&qty_rule(1, 100)));
        assert!(!qty_rule(1, 100).overlaps(&qty_rule(101, 200)));
    }

    #[test]
    fn test_zone_rule_offset_for() {
        let rule = ZoneRule {
            id: "z".to_string(),
            zone_name: "Zone B - Downtown".to_string(),
            cutoff_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            before_cutoff_offset_days: 1,
            after_cutoff_offset_days: 2,
            status: RuleStatus::Active,
        };

        assert_eq!(rule.offset_for(NaiveTime::from_hms_opt(11, 59, 59).unwrap()), 1);
        assert_eq!(rule.offset_for(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), 2);
    }

    #[test]
    fn test_zone_rule_serializes_cutoff_as_hhmm() {
        let rule = ZoneRule {
            id: "z".to_string(),
            zone_name: "Zone A - Miami Beach".to_string(),
            cutoff_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            before_cutoff_offset_days: 1,
            after_cutoff_offset_days: 2,
            status: RuleStatus::Active,
        };

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["cutoff_time"], "14:00");
        assert_eq!(json["status"], "active");

        let back: ZoneRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_price_list_lookup() {
        let list = PriceList {
            case_price: Money::from_cents(7500),
            unit_price: Money::from_cents(50),
        };
        assert_eq!(list.price_for(UnitType::Case).cents(), 7500);
        assert_eq!(list.price_for(UnitType::Unit).cents(), 50);
    }

    #[test]
    fn test_rule_status_default() {
        assert_eq!(RuleStatus::default(), RuleStatus::Active);
        assert!(!RuleStatus::Inactive.is_active());
    }
}
