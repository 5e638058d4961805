//! # Delivery Rule Evaluation
//!
//! Turns an order (quantity, zone, submission time) into a promised delivery
//! date and a delivery fee.
//!
//! ## Evaluation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderRequest { quantity: 150, zone: "Zone A", submitted_at: 13:30 }    │
//! │       │                                                                 │
//! │       ├──► resolve_quantity_offset(150)      → 2 days  (101-200 rule)   │
//! │       │                                                                 │
//! │       ├──► resolve_zone_offset("Zone A", 13:30)                         │
//! │       │         13:30 < 14:00 cutoff          → 1 day                   │
//! │       │                                                                 │
//! │       ├──► CompositionPolicy::Max             → 2 days                  │
//! │       │                                                                 │
//! │       └──► resolve_zone_fee("Zone A")         → $5.00                   │
//! │                                                                         │
//! │  DeliveryQuote { offset_days: 2, promised_date: submitted + 2, $5.00 } │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: the rule tables come in as arguments (or via
//! an explicit [`DeliveryRules`] value) and nothing is cached or mutated.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::{DeliveryZone, QuantityRule, ZoneRule};
use crate::validation::{
    validate_delivery_zone, validate_order_quantity, validate_quantity_rule, validate_zone_rule,
};

// =============================================================================
// Resolvers
// =============================================================================

/// Returns the delivery offset of the active quantity rule covering `quantity`.
///
/// ## Tie-break
/// When several active rules cover the quantity, the one with the smallest
/// `min_qty` wins; equal `min_qty` falls back to table order.
///
/// ## Errors
/// - `Validation` if `quantity` is zero
/// - `NoMatchingRule` if no active rule covers it
pub fn resolve_quantity_offset(quantity: u32, rules: &[QuantityRule]) -> CoreResult<u32> {
    validate_order_quantity(quantity)?;

    rules
        .iter()
        .filter(|r| r.status.is_active() && r.covers(quantity))
        .min_by_key(|r| r.min_qty)
        .map(|r| r.delivery_offset_days)
        .ok_or(CoreError::NoMatchingRule { quantity })
}

/// Returns the zone offset for an order submitted at `local_time`.
///
/// `local_time` is the time of day in the business's configured time zone;
/// use [`DeliveryRules::zone_offset`] to convert a timestamp first.
///
/// Zone names match exactly (case-sensitive). A submission exactly at the
/// cutoff gets the after-cutoff offset.
pub fn resolve_zone_offset(
    zone_name: &str,
    local_time: NaiveTime,
    rules: &[ZoneRule],
) -> CoreResult<u32> {
    rules
        .iter()
        .find(|r| r.status.is_active() && r.zone_name == zone_name)
        .map(|r| r.offset_for(local_time))
        .ok_or_else(|| CoreError::unknown_zone(zone_name))
}

/// Returns the delivery fee of the active zone named `zone_name`.
pub fn resolve_zone_fee(zone_name: &str, zones: &[DeliveryZone]) -> CoreResult<Money> {
    zones
        .iter()
        .find(|z| z.status.is_active() && z.name == zone_name)
        .map(|z| z.fee)
        .ok_or_else(|| CoreError::unknown_zone(zone_name))
}

// =============================================================================
// Composition
// =============================================================================

/// How the quantity and zone offsets combine into one promise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPolicy {
    /// The later of the two promises.
    #[default]
    Max,
    ZoneOnly,
    QuantityOnly,
    /// Both delays stack.
    Sum,
}

impl CompositionPolicy {
    pub fn compose(&self, quantity_offset: u32, zone_offset: u32) -> u32 {
        match self {
            CompositionPolicy::Max => quantity_offset.max(zone_offset),
            CompositionPolicy::ZoneOnly => zone_offset,
            CompositionPolicy::QuantityOnly => quantity_offset,
            CompositionPolicy::Sum => quantity_offset.saturating_add(zone_offset),
        }
    }
}

impl std::fmt::Display for CompositionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionPolicy::Max => write!(f, "max"),
            CompositionPolicy::ZoneOnly => write!(f, "zone_only"),
            CompositionPolicy::QuantityOnly => write!(f, "quantity_only"),
            CompositionPolicy::Sum => write!(f, "sum"),
        }
    }
}

impl std::str::FromStr for CompositionPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" => Ok(CompositionPolicy::Max),
            "zone_only" | "zone" => Ok(CompositionPolicy::ZoneOnly),
            "quantity_only" | "quantity" => Ok(CompositionPolicy::QuantityOnly),
            "sum" => Ok(CompositionPolicy::Sum),
            other => Err(ValidationError::InvalidFormat {
                field: "composition".to_string(),
                reason: format!(
                    "unknown policy '{}', expected max, zone_only, quantity_only or sum",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Order Request & Quote
// =============================================================================

/// The inputs of one delivery evaluation.
#[derive(Debug, Clone)]
pub struct OrderRequest<Tz: TimeZone> {
    pub quantity: u32,
    pub zone_name: String,
    pub submitted_at: DateTime<Tz>,
}

impl<Tz: TimeZone> OrderRequest<Tz> {
    pub fn new(quantity: u32, zone_name: impl Into<String>, submitted_at: DateTime<Tz>) -> Self {
        OrderRequest {
            quantity,
            zone_name: zone_name.into(),
            submitted_at,
        }
    }
}

/// Result of evaluating an order against the rule tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryQuote {
    pub quantity_offset_days: u32,
    pub zone_offset_days: u32,
    /// The composed promise in days.
    pub offset_days: u32,
    pub policy: CompositionPolicy,
    /// Local calendar date of submission plus `offset_days`.
    #[ts(as = "String")]
    pub promised_date: NaiveDate,
    pub fee: Money,
    /// Parts of the quote that came from [`Fallback`] instead of a rule.
    pub fallbacks: Vec<FallbackPart>,
}

/// Which resolver a fallback value replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPart {
    QuantityOffset,
    ZoneOffset,
    ZoneFee,
}

/// Defaults applied when a lookup misses.
///
/// A `None` field means the miss is surfaced to the caller as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub offset_days: Option<u32>,
    pub fee: Option<Money>,
}

// =============================================================================
// Delivery Rules
// =============================================================================

/// The rule tables of one business, plus the settings needed to read them.
///
/// Built explicitly by the caller (typically from the database) and passed
/// into evaluation; nothing here is global.
///
/// ## Example
/// ```rust
/// use chrono::{FixedOffset, TimeZone, Utc};
/// use coconut_core::defaults;
/// use coconut_core::delivery::OrderRequest;
///
/// let miami = FixedOffset::west_opt(5 * 3600).unwrap();
/// let rules = defaults::delivery_rules(miami).unwrap();
///
/// // 19:00 UTC is 14:00 in Miami: exactly at the cutoff, so after-cutoff applies
/// let at = Utc.with_ymd_and_hms(2026, 3, 2, 19, 0, 0).unwrap();
/// assert_eq!(rules.zone_offset("Zone A - Miami Beach", &at).unwrap(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRules {
    quantity_rules: Vec<QuantityRule>,
    zone_rules: Vec<ZoneRule>,
    zones: Vec<DeliveryZone>,
    timezone: FixedOffset,
    policy: CompositionPolicy,
}

impl DeliveryRules {
    /// Validates every rule and builds the rule set.
    ///
    /// ## Errors
    /// `InvalidRuleConfiguration` listing every failing field, prefixed with
    /// the table and row index (`zone_rules[0].zone_name`).
    pub fn new(
        quantity_rules: Vec<QuantityRule>,
        zone_rules: Vec<ZoneRule>,
        zones: Vec<DeliveryZone>,
        timezone: FixedOffset,
    ) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();

        for (i, rule) in quantity_rules.iter().enumerate() {
            errors.extend_prefixed(&format!("quantity_rules[{}]", i), validate_quantity_rule(rule));
        }
        for (i, rule) in zone_rules.iter().enumerate() {
            errors.extend_prefixed(&format!("zone_rules[{}]", i), validate_zone_rule(rule));
        }
        for (i, zone) in zones.iter().enumerate() {
            errors.extend_prefixed(&format!("zones[{}]", i), validate_delivery_zone(zone));
        }

        if !errors.is_empty() {
            return Err(CoreError::InvalidRuleConfiguration(errors));
        }

        Ok(DeliveryRules {
            quantity_rules,
            zone_rules,
            zones,
            timezone,
            policy: CompositionPolicy::default(),
        })
    }

    /// Replaces the composition policy.
    pub fn with_policy(mut self, policy: CompositionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn quantity_rules(&self) -> &[QuantityRule] {
        &self.quantity_rules
    }

    pub fn zone_rules(&self) -> &[ZoneRule] {
        &self.zone_rules
    }

    pub fn zones(&self) -> &[DeliveryZone] {
        &self.zones
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    pub fn policy(&self) -> CompositionPolicy {
        self.policy
    }

    /// Local time of day of a timestamp in the configured zone.
    pub fn local_time<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> NaiveTime {
        at.with_timezone(&self.timezone).time()
    }

    fn local_date<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }

    pub fn quantity_offset(&self, quantity: u32) -> CoreResult<u32> {
        resolve_quantity_offset(quantity, &self.quantity_rules)
    }

    pub fn zone_offset<Tz: TimeZone>(&self, zone_name: &str, at: &DateTime<Tz>) -> CoreResult<u32> {
        resolve_zone_offset(zone_name, self.local_time(at), &self.zone_rules)
    }

    pub fn zone_fee(&self, zone_name: &str) -> CoreResult<Money> {
        resolve_zone_fee(zone_name, &self.zones)
    }

    /// Evaluates an order strictly: any lookup miss is an error.
    pub fn quote<Tz: TimeZone>(&self, order: &OrderRequest<Tz>) -> CoreResult<DeliveryQuote> {
        self.quote_with_fallback(order, &Fallback::default())
    }

    /// Evaluates an order, substituting defaults for recoverable misses.
    ///
    /// ## Behaviour
    /// ```text
    /// resolver result        fallback configured   outcome
    /// ─────────────────────  ────────────────────  ─────────────────────────
    /// Ok(v)                  -                     v
    /// NoMatchingRule/Unknown Some(d)               d, part recorded
    /// NoMatchingRule/Unknown None                  error returned
    /// Validation error       -                     error returned
    /// ```
    pub fn quote_with_fallback<Tz: TimeZone>(
        &self,
        order: &OrderRequest<Tz>,
        fallback: &Fallback,
    ) -> CoreResult<DeliveryQuote> {
        let mut fallbacks = Vec::new();

        let quantity_offset = recover(
            self.quantity_offset(order.quantity),
            fallback.offset_days,
            FallbackPart::QuantityOffset,
            &mut fallbacks,
        )?;
        let zone_offset = recover(
            self.zone_offset(&order.zone_name, &order.submitted_at),
            fallback.offset_days,
            FallbackPart::ZoneOffset,
            &mut fallbacks,
        )?;
        let fee = recover(
            self.zone_fee(&order.zone_name),
            fallback.fee,
            FallbackPart::ZoneFee,
            &mut fallbacks,
        )?;

        let offset_days = self.policy.compose(quantity_offset, zone_offset);
        let submitted_on = self.local_date(&order.submitted_at);
        let promised_date = submitted_on
            .checked_add_days(Days::new(u64::from(offset_days)))
            .unwrap_or(NaiveDate::MAX);

        Ok(DeliveryQuote {
            quantity_offset_days: quantity_offset,
            zone_offset_days: zone_offset,
            offset_days,
            policy: self.policy,
            promised_date,
            fee,
            fallbacks,
        })
    }
}

fn recover<T>(
    result: CoreResult<T>,
    default: Option<T>,
    part: FallbackPart,
    used: &mut Vec<FallbackPart>,
) -> CoreResult<T> {
    match (result, default) {
        (Ok(value), _) => Ok(value),
        (Err(e), Some(value)) if e.is_recoverable() => {
            used.push(part);
            Ok(value)
        }
        (Err(e), _) => Err(e),
    }
}

// =============================================================================
// Consistency Reports
// =============================================================================

/// Pairs of active quantity rules whose ranges overlap, by id.
///
/// Overlaps are legal (the smallest `min_qty` wins) but usually a mistake
/// worth showing to the administrator.
pub fn overlapping_quantity_rules(rules: &[QuantityRule]) -> Vec<(String, String)> {
    let active: Vec<&QuantityRule> = rules.iter().filter(|r| r.status.is_active()).collect();
    let mut pairs = Vec::new();

    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if a.overlaps(b) {
                pairs.push((a.id.clone(), b.id.clone()));
            }
        }
    }

    pairs
}

/// Zone names that appear in only one of the two zone tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ZoneConsistency {
    /// Active zone rules with no active fee entry.
    pub rules_without_fee: Vec<String>,
    /// Active fee entries with no active zone rule.
    pub fees_without_rule: Vec<String>,
}

impl ZoneConsistency {
    pub fn is_consistent(&self) -> bool {
        self.rules_without_fee.is_empty() && self.fees_without_rule.is_empty()
    }
}

/// Compares zone rule names against delivery zone names.
pub fn zone_consistency(zone_rules: &[ZoneRule], zones: &[DeliveryZone]) -> ZoneConsistency {
    let rule_names: Vec<&str> = zone_rules
        .iter()
        .filter(|r| r.status.is_active())
        .map(|r| r.zone_name.as_str())
        .collect();
    let fee_names: Vec<&str> = zones
        .iter()
        .filter(|z| z.status.is_active())
        .map(|z| z.name.as_str())
        .collect();

    ZoneConsistency {
        rules_without_fee: rule_names
            .iter()
            .filter(|n| !fee_names.contains(n))
            .map(|n| n.to_string())
            .collect(),
        fees_without_rule: fee_names
            .iter()
            .filter(|n| !rule_names.contains(n))
            .map(|n| n.to_string())
            .collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
