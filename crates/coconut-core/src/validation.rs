//! # Validation Module
//!
//! Typed form drafts and field-level validation for rule tables.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form                                                   │
//! │  └── Fills a *Draft with Option fields (nothing coerced yet)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── draft.into_rule(id) → typed record or ValidationErrors            │
//! │  └── validate_* on records (also run when a rule set is loaded)        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE constraints                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator collects all failing fields into [`ValidationErrors`]
//! instead of stopping at the first one.
//!
//! ## Usage
//! ```rust
//! use coconut_core::validation::QuantityRuleDraft;
//!
//! let draft = QuantityRuleDraft {
//!     min_qty: Some(200),
//!     max_qty: Some(100),
//!     delivery_offset_days: Some(2),
//!     status: None,
//! };
//!
//! let errors = draft.into_rule("q4").unwrap_err();
//! assert_eq!(errors.to_string(), "min_qty must be less than max_qty");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrors};
use crate::money::Money;
use crate::schedule::parse_cutoff;
use crate::types::{
    CustomerPrice, DeliveryZone, PriceList, QuantityRule, RuleStatus, UnitType, VolumeTier,
    ZoneRule,
};
use crate::{MAX_AMOUNT_CENTS, MAX_DISCOUNT_BPS, MAX_NAME_LEN, MAX_OFFSET_DAYS};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a zone or customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an order quantity passed to the evaluator.
pub fn validate_order_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a delivery offset in days.
///
/// ## Rules
/// - 0 (same day) through [`MAX_OFFSET_DAYS`]
pub fn validate_offset_days(field: &str, days: u32) -> ValidationResult<()> {
    if days > MAX_OFFSET_DAYS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_OFFSET_DAYS as i64,
        });
    }
    Ok(())
}

/// Validates a stored fee or price.
///
/// ## Rules
/// - 0 through [`MAX_AMOUNT_CENTS`]
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() || amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validates an amount typed into a money field.
///
/// ## Rules
/// - Required
/// - Must parse as a decimal with at most two fractional digits
/// - At most [`MAX_AMOUNT_CENTS`]; the sign is checked by the caller
pub fn parse_amount(field: &str, input: Option<&str>) -> ValidationResult<Money> {
    let raw = input.map(str::trim).unwrap_or_default();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let amount = Money::parse_decimal(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be an amount like 7.50".to_string(),
    })?;

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(amount)
}

fn require<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(ValidationError::Required {
            field: field.to_string(),
        });
    }
    value
}

fn collect(errors: &mut ValidationErrors, result: ValidationResult<()>) {
    if let Err(e) = result {
        errors.push(e);
    }
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a quantity rule.
///
/// ## Rules
/// - `min_qty` ≥ 1 and `min_qty` < `max_qty`
/// - Offset within range
pub fn validate_quantity_rule(rule: &QuantityRule) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if rule.min_qty == 0 {
        errors.push(ValidationError::MustBePositive {
            field: "min_qty".to_string(),
        });
    }

    if rule.min_qty >= rule.max_qty {
        errors.push(ValidationError::InvalidRange {
            min_field: "min_qty".to_string(),
            max_field: "max_qty".to_string(),
        });
    }

    collect(
        &mut errors,
        validate_offset_days("delivery_offset_days", rule.delivery_offset_days),
    );

    errors
}

/// Validates a zone rule.
pub fn validate_zone_rule(rule: &ZoneRule) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    collect(&mut errors, validate_name("zone_name", &rule.zone_name));
    collect(
        &mut errors,
        validate_offset_days("before_cutoff_offset_days", rule.before_cutoff_offset_days),
    );
    collect(
        &mut errors,
        validate_offset_days("after_cutoff_offset_days", rule.after_cutoff_offset_days),
    );

    errors
}

/// Validates a delivery zone. Stored fees may be zero (free delivery).
pub fn validate_delivery_zone(zone: &DeliveryZone) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    collect(&mut errors, validate_name("name", &zone.name));

    collect(&mut errors, validate_amount("fee", zone.fee));

    errors
}

/// Validates one volume tier.
///
/// ## Rules
/// - `min_qty` ≥ 1 and `min_qty` ≤ `max_qty` (a single-quantity tier is allowed)
/// - Discount 0-100%
pub fn validate_volume_tier(tier: &VolumeTier) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if tier.min_qty == 0 {
        errors.push(ValidationError::MustBePositive {
            field: "min_qty".to_string(),
        });
    }

    if tier.min_qty > tier.max_qty {
        errors.push(ValidationError::InvalidRange {
            min_field: "min_qty".to_string(),
            max_field: "max_qty".to_string(),
        });
    }

    if tier.discount_bps > MAX_DISCOUNT_BPS {
        errors.push(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: MAX_DISCOUNT_BPS as i64,
        });
    }

    errors
}

/// Validates a whole volume tier table before it is saved.
///
/// ## Rules
/// - At least one tier
/// - Each tier valid; errors are prefixed `volume_tiers[i]`
pub fn validate_volume_tiers(tiers: &[VolumeTier]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if tiers.is_empty() {
        errors.push(ValidationError::LastRemaining {
            entity: "volume tier".to_string(),
        });
    }

    for (i, tier) in tiers.iter().enumerate() {
        errors.extend_prefixed(&format!("volume_tiers[{}]", i), validate_volume_tier(tier));
    }

    errors
}

/// Refuses to delete the last remaining row of a table.
pub fn ensure_can_remove(entity: &str, remaining: usize) -> ValidationResult<()> {
    if remaining <= 1 {
        return Err(ValidationError::LastRemaining {
            entity: entity.to_string(),
        });
    }
    Ok(())
}

/// Validates a customer price.
pub fn validate_customer_price(price: &CustomerPrice) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    collect(&mut errors, validate_name("customer_name", &price.customer_name));

    collect(&mut errors, validate_amount("custom_price", price.custom_price));

    errors
}

/// Validates the list prices.
pub fn validate_price_list(list: &PriceList) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    collect(&mut errors, validate_amount("case_price", list.case_price));
    collect(&mut errors, validate_amount("unit_price", list.unit_price));

    errors
}

// =============================================================================
// Drafts
// =============================================================================

/// Quantity rule as entered in the add/edit dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuantityRuleDraft {
    pub min_qty: Option<u32>,
    pub max_qty: Option<u32>,
    pub delivery_offset_days: Option<u32>,
    pub status: Option<RuleStatus>,
}

impl QuantityRuleDraft {
    /// Builds a rule or returns every field error.
    pub fn into_rule(self, id: impl Into<String>) -> Result<QuantityRule, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let min_qty = require(&mut errors, "min_qty", self.min_qty);
        let max_qty = require(&mut errors, "max_qty", self.max_qty);
        let offset = require(&mut errors, "delivery_offset_days", self.delivery_offset_days);

        let (Some(min_qty), Some(max_qty), Some(delivery_offset_days)) = (min_qty, max_qty, offset)
        else {
            return Err(errors);
        };

        let rule = QuantityRule {
            id: id.into(),
            min_qty,
            max_qty,
            delivery_offset_days,
            status: self.status.unwrap_or_default(),
        };

        validate_quantity_rule(&rule).into_result(rule)
    }
}

impl From<&QuantityRule> for QuantityRuleDraft {
    fn from(rule: &QuantityRule) -> Self {
        QuantityRuleDraft {
            min_qty: Some(rule.min_qty),
            max_qty: Some(rule.max_qty),
            delivery_offset_days: Some(rule.delivery_offset_days),
            status: Some(rule.status),
        }
    }
}

/// Zone rule as entered in the add/edit dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRuleDraft {
    pub zone_name: Option<String>,
    /// `HH:MM`, 24-hour.
    pub cutoff_time: Option<String>,
    pub before_cutoff_offset_days: Option<u32>,
    pub after_cutoff_offset_days: Option<u32>,
    pub status: Option<RuleStatus>,
}

impl Default for ZoneRuleDraft {
    /// Matches a freshly opened dialog: next day before cutoff, two days after.
    fn default() -> Self {
        ZoneRuleDraft {
            zone_name: None,
            cutoff_time: None,
            before_cutoff_offset_days: Some(1),
            after_cutoff_offset_days: Some(2),
            status: Some(RuleStatus::Active),
        }
    }
}

impl ZoneRuleDraft {
    /// Builds a rule or returns every field error.
    pub fn into_rule(self, id: impl Into<String>) -> Result<ZoneRule, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let zone_name = self.zone_name.unwrap_or_default().trim().to_string();
        collect(&mut errors, validate_name("zone_name", &zone_name));

        let cutoff_time = match parse_cutoff(self.cutoff_time.as_deref().unwrap_or_default()) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let before = require(
            &mut errors,
            "before_cutoff_offset_days",
            self.before_cutoff_offset_days,
        );
        let after = require(
            &mut errors,
            "after_cutoff_offset_days",
            self.after_cutoff_offset_days,
        );

        let (Some(cutoff_time), Some(before), Some(after), true) =
            (cutoff_time, before, after, errors.is_empty())
        else {
            return Err(errors);
        };

        let rule = ZoneRule {
            id: id.into(),
            zone_name,
            cutoff_time,
            before_cutoff_offset_days: before,
            after_cutoff_offset_days: after,
            status: self.status.unwrap_or_default(),
        };

        validate_zone_rule(&rule).into_result(rule)
    }
}

/// Delivery zone as entered in the add/edit dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryZoneDraft {
    pub name: Option<String>,
    /// Decimal amount, e.g. `"7.50"`.
    pub fee: Option<String>,
    pub description: Option<String>,
    pub status: Option<RuleStatus>,
}

impl DeliveryZoneDraft {
    /// Builds a zone or returns every field error.
    ///
    /// New and edited zones must carry a positive fee.
    pub fn into_zone(self, id: impl Into<String>) -> Result<DeliveryZone, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.unwrap_or_default().trim().to_string();
        collect(&mut errors, validate_name("name", &name));

        let fee = match parse_amount("fee", self.fee.as_deref()) {
            Ok(fee) if fee.is_positive() => Some(fee),
            Ok(_) => {
                errors.push(ValidationError::MustBePositive {
                    field: "fee".to_string(),
                });
                None
            }
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let (Some(fee), true) = (fee, errors.is_empty()) else {
            return Err(errors);
        };

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let zone = DeliveryZone {
            id: id.into(),
            name,
            fee,
            description,
            status: self.status.unwrap_or_default(),
        };

        validate_delivery_zone(&zone).into_result(zone)
    }
}

/// One row of the volume tier editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeTierDraft {
    pub min_qty: Option<u32>,
    pub max_qty: Option<u32>,
    /// Whole percent as typed (0-100).
    pub discount_percent: Option<u32>,
}

impl VolumeTierDraft {
    pub fn into_tier(self, id: impl Into<String>) -> Result<VolumeTier, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let min_qty = require(&mut errors, "min_qty", self.min_qty);
        let max_qty = require(&mut errors, "max_qty", self.max_qty);
        let percent = require(&mut errors, "discount", self.discount_percent);

        let (Some(min_qty), Some(max_qty), Some(percent)) = (min_qty, max_qty, percent) else {
            return Err(errors);
        };

        let tier = VolumeTier {
            id: id.into(),
            min_qty,
            max_qty,
            discount_bps: percent.saturating_mul(100),
        };

        validate_volume_tier(&tier).into_result(tier)
    }
}

/// Customer price as entered in the edit dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerPriceDraft {
    pub customer_name: Option<String>,
    pub custom_price: Option<String>,
    pub unit_type: Option<UnitType>,
}

impl CustomerPriceDraft {
    pub fn into_price(self, id: impl Into<String>) -> Result<CustomerPrice, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let customer_name = self.customer_name.unwrap_or_default().trim().to_string();
        collect(&mut errors, validate_name("customer_name", &customer_name));

        let custom_price = match parse_amount("custom_price", self.custom_price.as_deref()) {
            Ok(p) => Some(p),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let unit_type = require(&mut errors, "unit_type", self.unit_type);

        let (Some(custom_price), Some(unit_type), true) =
            (custom_price, unit_type, errors.is_empty())
        else {
            return Err(errors);
        };

        let price = CustomerPrice {
            id: id.into(),
            customer_name,
            custom_price,
            unit_type,
        };

        validate_customer_price(&price).into_result(price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("zone_name", "Zone A - Miami Beach").is_ok());
        assert!(validate_name("zone_name", "").is_err());
        assert!(validate_name("zone_name", "   ").is_err());
        assert!(validate_name("zone_name", &"Z".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_order_quantity() {
        assert!(validate_order_quantity(1).is_ok());
        assert!(validate_order_quantity(0).is_err());
    }

    #[test]
    fn test_quantity_draft_valid() {
        let rule = QuantityRuleDraft {
            min_qty: Some(301),
            max_qty: Some(400),
            delivery_offset_days: Some(4),
            status: None,
        }
        .into_rule("q4")
        .unwrap();

        assert_eq!(rule.id, "q4");
        assert_eq!((rule.min_qty, rule.max_qty), (301, 400));
        assert_eq!(rule.status, RuleStatus::Active);
    }

    #[test]
    fn test_quantity_draft_rejects_equal_bounds() {
        let errors = QuantityRuleDraft {
            min_qty: Some(100),
            max_qty: Some(100),
            delivery_offset_days: Some(1),
            status: None,
        }
        .into_rule("q")
        .unwrap_err();

        assert_eq!(errors.for_field("min_qty").count(), 1);
    }

    #[test]
    fn test_quantity_draft_reports_all_missing_fields() {
        let errors = QuantityRuleDraft::default().into_rule("q").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.for_field("max_qty").count(), 1);
    }

    #[test]
    fn test_quantity_draft_offset_too_large() {
        let errors = QuantityRuleDraft {
            min_qty: Some(1),
            max_qty: Some(10),
            delivery_offset_days: Some(MAX_OFFSET_DAYS + 1),
            status: None,
        }
        .into_rule("q")
        .unwrap_err();

        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_zone_draft_requires_name_and_cutoff() {
        let errors = ZoneRuleDraft::default().into_rule("z").unwrap_err();
        assert_eq!(errors.for_field("zone_name").count(), 1);
        assert_eq!(errors.for_field("cutoff_time").count(), 1);
    }

    #[test]
    fn test_zone_draft_rejects_bad_cutoff() {
        let errors = ZoneRuleDraft {
            zone_name: Some("Zone D - Keys".to_string()),
            cutoff_time: Some("2 PM".to_string()),
            ..ZoneRuleDraft::default()
        }
        .into_rule("z")
        .unwrap_err();

        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_zone_draft_valid_uses_dialog_defaults() {
        let rule = ZoneRuleDraft {
            zone_name: Some("  Zone D - Keys ".to_string()),
            cutoff_time: Some("13:30".to_string()),
            ..ZoneRuleDraft::default()
        }
        .into_rule("z4")
        .unwrap();

        assert_eq!(rule.zone_name, "Zone D - Keys");
        assert_eq!(rule.before_cutoff_offset_days, 1);
        assert_eq!(rule.after_cutoff_offset_days, 2);
    }

    #[test]
    fn test_delivery_zone_draft_requires_positive_fee() {
        let errors = DeliveryZoneDraft {
            name: Some("Zone D - Keys".to_string()),
            fee: Some("0".to_string()),
            ..DeliveryZoneDraft::default()
        }
        .into_zone("zone-4")
        .unwrap_err();
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::MustBePositive { .. })
        ));

        let errors = DeliveryZoneDraft::default().into_zone("zone-4").unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_delivery_zone_draft_valid() {
        let zone = DeliveryZoneDraft {
            name: Some("Zone D - Keys".to_string()),
            fee: Some("12.5".to_string()),
            description: Some("   ".to_string()),
            status: Some(RuleStatus::Inactive),
        }
        .into_zone("zone-4")
        .unwrap();

        assert_eq!(zone.fee.cents(), 1250);
        assert_eq!(zone.description, None);
        assert_eq!(zone.status, RuleStatus::Inactive);
    }

    #[test]
    fn test_volume_tiers() {
        let tier = |min, max, bps| VolumeTier {
            id: "t".to_string(),
            min_qty: min,
            max_qty: max,
            discount_bps: bps,
        };

        assert!(validate_volume_tiers(&[tier(1, 100, 0), tier(101, 200, 500)]).is_empty());
        assert!(!validate_volume_tiers(&[]).is_empty());

        let errors = validate_volume_tiers(&[tier(1, 100, 0), tier(300, 200, 10_001)]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("volume_tiers[1].discount").count(), 1);
    }

    #[test]
    fn test_volume_tier_bounds() {
        let tier = |min, max| VolumeTier {
            id: "t".to_string(),
            min_qty: min,
            max_qty: max,
            discount_bps: 500,
        };

        assert!(validate_volume_tier(&tier(50, 50)).is_empty());
        assert_eq!(
            validate_volume_tier(&tier(0, 10)).for_field("min_qty").count(),
            1
        );
        assert_eq!(validate_volume_tier(&tier(0, 0)).len(), 1);
    }

    #[test]
    fn test_volume_tier_draft_converts_percent() {
        let tier = VolumeTierDraft {
            min_qty: Some(101),
            max_qty: Some(200),
            discount_percent: Some(5),
        }
        .into_tier("t2")
        .unwrap();
        assert_eq!(tier.discount_bps, 500);

        let errors = VolumeTierDraft {
            min_qty: Some(1),
            max_qty: Some(2),
            discount_percent: Some(101),
        }
        .into_tier("t")
        .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_ensure_can_remove() {
        assert!(ensure_can_remove("volume tier", 2).is_ok());
        assert!(ensure_can_remove("volume tier", 1).is_err());
    }

    #[test]
    fn test_customer_price_draft() {
        let price = CustomerPriceDraft {
            customer_name: Some("Hilton Hotel Miami".to_string()),
            custom_price: Some("4.50".to_string()),
            unit_type: Some(UnitType::Unit),
        }
        .into_price("c1")
        .unwrap();
        assert_eq!(price.custom_price.cents(), 450);

        let errors = CustomerPriceDraft {
            customer_name: Some("Paradise Events".to_string()),
            custom_price: Some("-1".to_string()),
            unit_type: Some(UnitType::Case),
        }
        .into_price("c2")
        .unwrap_err();
        assert_eq!(errors.for_field("custom_price").count(), 1);
    }

    #[test]
    fn test_amounts_are_capped() {
        assert!(parse_amount("fee", Some("1000000.00")).is_ok());
        assert!(matches!(
            parse_amount("fee", Some("1000000.01")),
            Err(ValidationError::OutOfRange { max: MAX_AMOUNT_CENTS, .. })
        ));

        let errors = CustomerPriceDraft {
            customer_name: Some("Hilton Hotel Miami".to_string()),
            custom_price: Some("10000000000000".to_string()),
            unit_type: Some(UnitType::Unit),
        }
        .into_price("c3")
        .unwrap_err();
        assert_eq!(errors.for_field("custom_price").count(), 1);

        let list = PriceList {
            case_price: Money::from_cents(-1),
            unit_price: Money::from_cents(MAX_AMOUNT_CENTS + 1),
        };
        assert_eq!(validate_price_list(&list).len(), 2);
    }
}
