//! # Delivery Service
//!
//! Entry point for everything the admin frontend asks of the backend:
//! quotes, rule-table edits and consistency warnings.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  quote(150, "Zone A", now)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RuleCache::get() ──► Arc<DeliveryRules>                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rules.quote_with_fallback(order, configured fallback)                 │
//! │                                                                         │
//! │  add_zone_rule(draft)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.into_rule(id)  ── ValidationErrors ──► ServiceError::Validation │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.zone_rules().insert() ──► RuleCache::invalidate()                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent edits are last-write-wins.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use coconut_core::delivery::{overlapping_quantity_rules, zone_consistency, ZoneConsistency};
use coconut_core::pricing::{price_order, PriceBreakdown, PriceRequest};
use coconut_core::validation::{
    ensure_can_remove, validate_price_list, validate_volume_tiers, CustomerPriceDraft,
    DeliveryZoneDraft, QuantityRuleDraft, VolumeTierDraft, ZoneRuleDraft,
};
use coconut_core::{
    CompositionPolicy, CustomerPrice, DeliveryQuote, DeliveryRules, DeliveryZone, Fallback,
    OrderRequest, PriceList, QuantityRule, UnitType, ValidationErrors, VolumeTier, ZoneRule,
};
use coconut_db::{generate_id, Database, DbConfig, DbError};

use crate::cache::RuleCache;
use crate::config::AppConfig;
use crate::error::ServiceResult;

/// Delivery quote plus the order price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderQuote {
    pub delivery: DeliveryQuote,
    pub price: PriceBreakdown,
}

/// Warnings to show above the rule tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Pairs of active quantity rule ids whose ranges overlap.
    pub overlapping_quantity_rules: Vec<(String, String)>,
    pub zones: ZoneConsistency,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.overlapping_quantity_rules.is_empty() && self.zones.is_consistent()
    }
}

#[derive(Debug)]
pub struct DeliveryService {
    db: Database,
    cache: RuleCache,
    fallback: Fallback,
}

impl DeliveryService {
    pub fn new(
        db: Database,
        timezone: chrono::FixedOffset,
        policy: CompositionPolicy,
        fallback: Fallback,
    ) -> Self {
        DeliveryService {
            cache: RuleCache::new(db.clone(), timezone, policy),
            db,
            fallback,
        }
    }

    /// Opens the configured database and builds the service.
    pub async fn from_config(config: &AppConfig) -> ServiceResult<Self> {
        let timezone = config.timezone()?;
        let fallback = config.fallback()?;

        let db = Database::new(
            DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
        )
        .await?;

        info!(
            utc_offset = %timezone,
            policy = %config.delivery.composition,
            "Delivery service ready"
        );

        Ok(Self::new(db, timezone, config.delivery.composition, fallback))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// The current rule set (cached).
    pub async fn rules(&self) -> ServiceResult<Arc<DeliveryRules>> {
        self.cache.get().await
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    /// Delivery date and fee for an order.
    pub async fn quote<Tz: TimeZone>(
        &self,
        quantity: u32,
        zone_name: &str,
        submitted_at: &DateTime<Tz>,
    ) -> ServiceResult<DeliveryQuote> {
        let order = OrderRequest::new(quantity, zone_name, submitted_at.with_timezone(&Utc));
        let rules = self.cache.get().await?;

        let quote = rules.quote_with_fallback(&order, &self.fallback)?;

        if !quote.fallbacks.is_empty() {
            warn!(
                quantity,
                zone = %zone_name,
                fallbacks = ?quote.fallbacks,
                "Quote used fallback values"
            );
        }
        debug!(
            quantity,
            zone = %zone_name,
            offset_days = quote.offset_days,
            fee = %quote.fee,
            "Quoted delivery"
        );

        Ok(quote)
    }

    /// Delivery quote plus the priced order.
    pub async fn quote_order<Tz: TimeZone>(
        &self,
        quantity: u32,
        zone_name: &str,
        unit_type: UnitType,
        customer: Option<&str>,
        submitted_at: &DateTime<Tz>,
    ) -> ServiceResult<OrderQuote> {
        let delivery = self.quote(quantity, zone_name, submitted_at).await?;

        let pricing = self.cache.pricing().await?;

        let request = PriceRequest {
            quantity,
            unit_type,
            customer: customer.map(str::to_string),
            delivery_fee: delivery.fee,
        };
        let price = price_order(
            &request,
            &pricing.price_list,
            &pricing.customer_prices,
            &pricing.volume_tiers,
        )?;

        Ok(OrderQuote { delivery, price })
    }

    /// Stored list prices, or the defaults before any were saved.
    pub async fn price_list(&self) -> ServiceResult<PriceList> {
        Ok(self.cache.pricing().await?.price_list)
    }

    // =========================================================================
    // Quantity Rules
    // =========================================================================

    pub async fn add_quantity_rule(&self, draft: QuantityRuleDraft) -> ServiceResult<QuantityRule> {
        let rule = draft.into_rule(generate_id())?;
        let rule = self.db.quantity_rules().insert(&rule).await?;
        self.cache.invalidate().await;
        info!(id = %rule.id, "Quantity rule added");
        Ok(rule)
    }

    pub async fn update_quantity_rule(
        &self,
        id: &str,
        draft: QuantityRuleDraft,
    ) -> ServiceResult<QuantityRule> {
        let rule = draft.into_rule(id)?;
        self.db.quantity_rules().update(&rule).await?;
        self.cache.invalidate().await;
        info!(id = %id, "Quantity rule updated");
        Ok(rule)
    }

    pub async fn remove_quantity_rule(&self, id: &str) -> ServiceResult<()> {
        self.db.quantity_rules().delete(id).await?;
        self.cache.invalidate().await;
        info!(id = %id, "Quantity rule removed");
        Ok(())
    }

    // =========================================================================
    // Zone Rules
    // =========================================================================

    pub async fn add_zone_rule(&self, draft: ZoneRuleDraft) -> ServiceResult<ZoneRule> {
        let rule = draft.into_rule(generate_id())?;
        let rule = self.db.zone_rules().insert(&rule).await?;
        self.cache.invalidate().await;
        info!(zone = %rule.zone_name, "Zone rule added");
        Ok(rule)
    }

    pub async fn update_zone_rule(&self, id: &str, draft: ZoneRuleDraft) -> ServiceResult<ZoneRule> {
        let rule = draft.into_rule(id)?;
        self.db.zone_rules().update(&rule).await?;
        self.cache.invalidate().await;
        info!(zone = %rule.zone_name, "Zone rule updated");
        Ok(rule)
    }

    pub async fn remove_zone_rule(&self, id: &str) -> ServiceResult<()> {
        self.db.zone_rules().delete(id).await?;
        self.cache.invalidate().await;
        info!(id = %id, "Zone rule removed");
        Ok(())
    }

    // =========================================================================
    // Delivery Zones
    // =========================================================================

    pub async fn add_delivery_zone(&self, draft: DeliveryZoneDraft) -> ServiceResult<DeliveryZone> {
        let zone = draft.into_zone(generate_id())?;
        let zone = self.db.delivery_zones().insert(&zone).await?;
        self.cache.invalidate().await;
        info!(zone = %zone.name, fee = %zone.fee, "Delivery zone added");
        Ok(zone)
    }

    pub async fn update_delivery_zone(
        &self,
        id: &str,
        draft: DeliveryZoneDraft,
    ) -> ServiceResult<DeliveryZone> {
        let zone = draft.into_zone(id)?;
        self.db.delivery_zones().update(&zone).await?;
        self.cache.invalidate().await;
        info!(zone = %zone.name, fee = %zone.fee, "Delivery zone updated");
        Ok(zone)
    }

    pub async fn remove_delivery_zone(&self, id: &str) -> ServiceResult<()> {
        self.db.delivery_zones().delete(id).await?;
        self.cache.invalidate().await;
        info!(id = %id, "Delivery zone removed");
        Ok(())
    }

    // =========================================================================
    // Pricing Tables
    // =========================================================================

    pub async fn add_volume_tier(&self, draft: VolumeTierDraft) -> ServiceResult<VolumeTier> {
        let tier = draft.into_tier(generate_id())?;
        let tier = self.db.volume_tiers().insert(&tier).await?;
        self.cache.invalidate_pricing().await;
        info!(id = %tier.id, bps = tier.discount_bps, "Volume tier added");
        Ok(tier)
    }

    pub async fn update_volume_tier(
        &self,
        id: &str,
        draft: VolumeTierDraft,
    ) -> ServiceResult<VolumeTier> {
        let tier = draft.into_tier(id)?;
        self.db.volume_tiers().update(&tier).await?;
        self.cache.invalidate_pricing().await;
        Ok(tier)
    }

    /// Replaces the whole tier table, as the tier editor's Save button does.
    ///
    /// Errors are prefixed with the row, e.g. `volume_tiers[1].discount`.
    /// Nothing is written unless every row is valid and at least one remains.
    pub async fn save_volume_tiers(
        &self,
        drafts: Vec<VolumeTierDraft>,
    ) -> ServiceResult<Vec<VolumeTier>> {
        let mut errors = ValidationErrors::new();
        let mut tiers = Vec::with_capacity(drafts.len());

        for (i, draft) in drafts.into_iter().enumerate() {
            match draft.into_tier(generate_id()) {
                Ok(tier) => tiers.push(tier),
                Err(e) => errors.extend_prefixed(&format!("volume_tiers[{}]", i), e),
            }
        }

        if errors.is_empty() {
            errors = validate_volume_tiers(&tiers);
        }
        let tiers = errors.into_result(tiers)?;

        self.db.volume_tiers().replace_all(&tiers).await?;
        self.cache.invalidate_pricing().await;
        info!(count = tiers.len(), "Volume tiers saved");
        Ok(tiers)
    }

    /// Removes a tier; the last tier cannot be removed.
    pub async fn remove_volume_tier(&self, id: &str) -> ServiceResult<()> {
        if self.db.volume_tiers().get_by_id(id).await?.is_none() {
            return Err(DbError::not_found("VolumeTier", id).into());
        }

        let remaining = self.db.volume_tiers().count().await?;
        ensure_can_remove("volume tier", usize::try_from(remaining).unwrap_or(0))?;

        self.db.volume_tiers().delete(id).await?;
        self.cache.invalidate_pricing().await;
        info!(id = %id, "Volume tier removed");
        Ok(())
    }

    /// Adds a negotiated price; a second price for the same customer and
    /// unit type is a `UniqueViolation`.
    pub async fn add_customer_price(&self, draft: CustomerPriceDraft) -> ServiceResult<CustomerPrice> {
        let price = draft.into_price(generate_id())?;
        let price = self.db.customer_prices().insert(&price).await?;
        self.cache.invalidate_pricing().await;
        info!(customer = %price.customer_name, "Customer price added");
        Ok(price)
    }

    pub async fn update_customer_price(
        &self,
        id: &str,
        draft: CustomerPriceDraft,
    ) -> ServiceResult<CustomerPrice> {
        let price = draft.into_price(id)?;
        self.db.customer_prices().update(&price).await?;
        self.cache.invalidate_pricing().await;
        Ok(price)
    }

    pub async fn remove_customer_price(&self, id: &str) -> ServiceResult<()> {
        self.db.customer_prices().delete(id).await?;
        self.cache.invalidate_pricing().await;
        Ok(())
    }

    pub async fn set_price_list(&self, list: PriceList) -> ServiceResult<()> {
        let list = validate_price_list(&list).into_result(list)?;
        self.db.price_list().set(&list).await?;
        self.cache.invalidate_pricing().await;
        info!(case = %list.case_price, unit = %list.unit_price, "Price list saved");
        Ok(())
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Overlapping quantity ranges and zone names missing from one table.
    pub async fn consistency_report(&self) -> ServiceResult<ConsistencyReport> {
        let rules = self.cache.get().await?;

        Ok(ConsistencyReport {
            overlapping_quantity_rules: overlapping_quantity_rules(rules.quantity_rules()),
            zones: zone_consistency(rules.zone_rules(), rules.zones()),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ServiceError};
    use chrono::FixedOffset;
    use coconut_core::delivery::FallbackPart;
    use coconut_core::{CoreError, Money, ValidationError};
    use coconut_db::seed_defaults;

    const ZONE_A: &str = "Zone A - Miami Beach";

    fn miami() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    async fn service_with(fallback: Fallback) -> DeliveryService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_defaults(&db).await.unwrap();
        DeliveryService::new(db, miami(), CompositionPolicy::Max, fallback)
    }

    async fn service() -> DeliveryService {
        service_with(Fallback::default()).await
    }

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        miami().with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_quote_from_seeded_tables() {
        let service = service().await;
        let quote = service.quote(150, ZONE_A, &at(13, 59)).await.unwrap();

        assert_eq!(quote.quantity_offset_days, 2);
        assert_eq!(quote.zone_offset_days, 1);
        assert_eq!(quote.offset_days, 2);
        assert_eq!(quote.fee, Money::from_cents(500));
    }

    #[tokio::test]
    async fn test_quote_accepts_utc_timestamps() {
        let service = service().await;
        // 19:00 UTC is 14:00 in Miami
        let utc = Utc.with_ymd_and_hms(2026, 3, 2, 19, 0, 0).unwrap();
        let quote = service.quote(10, ZONE_A, &utc).await.unwrap();
        assert_eq!(quote.zone_offset_days, 2);
    }

    #[tokio::test]
    async fn test_unknown_zone_without_fallback() {
        let service = service().await;
        let err = service.quote(10, "Nonexistent Zone", &at(9, 0)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Rules(CoreError::UnknownZone { .. })));
        assert_eq!(err.code(), ErrorCode::UnknownZone);
    }

    #[tokio::test]
    async fn test_configured_fallback_applies() {
        let service = service_with(Fallback {
            offset_days: Some(5),
            fee: Some(Money::from_cents(1500)),
        })
        .await;

        let quote = service.quote(301, ZONE_A, &at(9, 0)).await.unwrap();
        assert_eq!(quote.offset_days, 5);
        assert_eq!(quote.fallbacks, vec![FallbackPart::QuantityOffset]);
    }

    #[tokio::test]
    async fn test_edit_invalidates_cache() {
        let service = service().await;
        assert_eq!(service.quote(150, ZONE_A, &at(9, 0)).await.unwrap().offset_days, 2);

        let rule = service.rules().await.unwrap().quantity_rules()[1].clone();
        let mut draft = QuantityRuleDraft::from(&rule);
        draft.delivery_offset_days = Some(6);
        service.update_quantity_rule(&rule.id, draft).await.unwrap();

        assert_eq!(service.quote(150, ZONE_A, &at(9, 0)).await.unwrap().offset_days, 6);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_db() {
        let service = service().await;
        let draft = QuantityRuleDraft {
            min_qty: Some(300),
            max_qty: Some(200),
            delivery_offset_days: Some(1),
            status: None,
        };

        let err = service.add_quantity_rule(draft).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(service.database().quantity_rules().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_rule_is_not_found() {
        let service = service().await;
        let draft = QuantityRuleDraft {
            min_qty: Some(1),
            max_qty: Some(5),
            delivery_offset_days: Some(1),
            status: None,
        };
        let err = service.update_quantity_rule("missing", draft).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_zone_rule_and_fee_makes_zone_quotable() {
        let service = service().await;

        service
            .add_zone_rule(ZoneRuleDraft {
                zone_name: Some("Zone D - Key Biscayne".to_string()),
                cutoff_time: Some("10:00".to_string()),
                ..ZoneRuleDraft::default()
            })
            .await
            .unwrap();
        service
            .add_delivery_zone(DeliveryZoneDraft {
                name: Some("Zone D - Key Biscayne".to_string()),
                fee: Some("12.50".to_string()),
                ..DeliveryZoneDraft::default()
            })
            .await
            .unwrap();

        let quote = service.quote(10, "Zone D - Key Biscayne", &at(11, 0)).await.unwrap();
        assert_eq!(quote.zone_offset_days, 2);
        assert_eq!(quote.fee, Money::from_cents(1250));
    }

    #[tokio::test]
    async fn test_zone_draft_rejects_zero_fee() {
        let service = service().await;
        let err = service
            .add_delivery_zone(DeliveryZoneDraft {
                name: Some("Zone E".to_string()),
                fee: Some("0".to_string()),
                ..DeliveryZoneDraft::default()
            })
            .await
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.for_field("fee").count(), 1);
    }

    #[tokio::test]
    async fn test_last_volume_tier_cannot_be_removed() {
        let service = service().await;
        let tiers = service.database().volume_tiers().list().await.unwrap();

        for tier in &tiers[..tiers.len() - 1] {
            service.remove_volume_tier(&tier.id).await.unwrap();
        }

        let last = &tiers[tiers.len() - 1];
        let err = service.remove_volume_tier(&last.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ref errors)
                if matches!(errors.iter().next(), Some(ValidationError::LastRemaining { .. }))
        ));
    }

    #[tokio::test]
    async fn test_quote_order_prices_with_customer_and_tier() {
        let service = service().await;
        let quote = service
            .quote_order(250, "Zone B - Downtown", UnitType::Unit, Some("Hilton Hotel Miami"), &at(9, 0))
            .await
            .unwrap();

        assert_eq!(quote.delivery.fee, Money::from_cents(750));
        assert_eq!(quote.price.unit_price, Money::from_cents(450));
        assert_eq!(quote.price.discount_bps, 1000);
        assert_eq!(quote.price.total, Money::from_cents(101_250 + 750));
    }

    #[tokio::test]
    async fn test_saved_price_list_replaces_defaults() {
        let service = service().await;
        assert_eq!(service.price_list().await.unwrap().case_price, Money::from_cents(7500));

        service
            .set_price_list(PriceList {
                case_price: Money::from_cents(8000),
                unit_price: Money::from_cents(60),
            })
            .await
            .unwrap();

        let quote = service
            .quote_order(2, ZONE_A, UnitType::Case, None, &at(9, 0))
            .await
            .unwrap();
        assert_eq!(quote.price.subtotal, Money::from_cents(16_000));
        assert_eq!(quote.price.total, Money::from_cents(16_500));
    }

    #[tokio::test]
    async fn test_negative_price_list_is_a_field_error() {
        let service = service().await;
        let err = service
            .set_price_list(PriceList {
                case_price: Money::from_cents(-100),
                unit_price: Money::from_cents(50),
            })
            .await
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.for_field("case_price").count(), 1);
        assert!(service.database().price_list().get().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_volume_tier_bounds_match_storage() {
        let service = service().await;

        let single = service
            .add_volume_tier(VolumeTierDraft {
                min_qty: Some(50),
                max_qty: Some(50),
                discount_percent: Some(5),
            })
            .await
            .unwrap();
        assert_eq!((single.min_qty, single.max_qty), (50, 50));

        let err = service
            .add_volume_tier(VolumeTierDraft {
                min_qty: Some(0),
                max_qty: Some(10),
                discount_percent: Some(5),
            })
            .await
            .unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error, got {:?}", err);
        };
        assert_eq!(errors.for_field("min_qty").count(), 1);

        let err = service
            .update_volume_tier(
                &single.id,
                VolumeTierDraft {
                    min_qty: Some(60),
                    max_qty: Some(50),
                    discount_percent: Some(5),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_save_volume_tiers_replaces_table() {
        let service = service().await;
        let draft = |min, max, percent| VolumeTierDraft {
            min_qty: Some(min),
            max_qty: Some(max),
            discount_percent: Some(percent),
        };

        let before = service.quote_order(250, ZONE_A, UnitType::Unit, None, &at(9, 0)).await.unwrap();
        assert_eq!(before.price.discount_bps, 1000);

        let saved = service
            .save_volume_tiers(vec![draft(1, 99, 0), draft(100, 999_999, 20)])
            .await
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(service.database().volume_tiers().list().await.unwrap(), saved);

        let after = service.quote_order(250, ZONE_A, UnitType::Unit, None, &at(9, 0)).await.unwrap();
        assert_eq!(after.price.discount_bps, 2000);
    }

    #[tokio::test]
    async fn test_save_volume_tiers_rejects_bad_tables() {
        let service = service().await;

        let err = service.save_volume_tiers(Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ref errors)
                if matches!(errors.iter().next(), Some(ValidationError::LastRemaining { .. }))
        ));

        let err = service
            .save_volume_tiers(vec![
                VolumeTierDraft {
                    min_qty: Some(1),
                    max_qty: Some(100),
                    discount_percent: Some(0),
                },
                VolumeTierDraft {
                    min_qty: Some(101),
                    max_qty: Some(200),
                    discount_percent: Some(150),
                },
            ])
            .await
            .unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.for_field("volume_tiers[1].discount").count(), 1);

        assert_eq!(service.database().volume_tiers().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_pricing_edits_keep_delivery_rules_cached() {
        let service = service().await;
        let rules = service.rules().await.unwrap();

        service
            .add_customer_price(CustomerPriceDraft {
                customer_name: Some("Fontainebleau".to_string()),
                custom_price: Some("0.40".to_string()),
                unit_type: Some(UnitType::Unit),
            })
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&rules, &service.rules().await.unwrap()));

        let quote = service
            .quote_order(10, ZONE_A, UnitType::Unit, Some("Fontainebleau"), &at(9, 0))
            .await
            .unwrap();
        assert_eq!(quote.price.unit_price, Money::from_cents(40));
    }

    #[tokio::test]
    async fn test_add_customer_price_twice_is_duplicate() {
        let service = service().await;
        let draft = CustomerPriceDraft {
            customer_name: Some("Hilton Hotel Miami".to_string()),
            custom_price: Some("4.00".to_string()),
            unit_type: Some(UnitType::Unit),
        };

        let err = service.add_customer_price(draft).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_consistency_report_of_seed_data() {
        let service = service().await;
        let report = service.consistency_report().await.unwrap();

        assert!(!report.is_clean());
        assert!(report.overlapping_quantity_rules.is_empty());
        assert_eq!(report.zones.rules_without_fee, vec!["Zone C - Airport Area".to_string()]);
    }
}
