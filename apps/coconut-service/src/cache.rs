//! # Rule Cache
//!
//! Read-through cache of the current [`DeliveryRules`] and [`PricingTables`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get() / pricing()                                                      │
//! │    │                                                                    │
//! │    ├── cached? ──yes──► Arc<..> (shared, immutable)                    │
//! │    │                                                                    │
//! │    └── no ──► write lock ──► load from SQLite ──► store ──► Arc        │
//! │                                                                         │
//! │  invalidate()          ──► drop delivery rules; next get() reloads     │
//! │  invalidate_pricing()  ──► drop pricing tables; next pricing() reloads │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no expiry: each slot changes only when something invalidates it.
//! Writers going straight to the database must invalidate too.

use chrono::FixedOffset;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use coconut_core::{
    defaults, CompositionPolicy, CustomerPrice, DeliveryRules, PriceList, VolumeTier,
};
use coconut_db::Database;

use crate::error::ServiceResult;

/// Everything `price_order` reads besides the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingTables {
    /// Stored list prices, or the defaults before any were saved.
    pub price_list: PriceList,
    pub customer_prices: Vec<CustomerPrice>,
    pub volume_tiers: Vec<VolumeTier>,
}

#[derive(Debug)]
pub struct RuleCache {
    db: Database,
    timezone: FixedOffset,
    policy: CompositionPolicy,
    slot: RwLock<Option<Arc<DeliveryRules>>>,
    pricing: RwLock<Option<Arc<PricingTables>>>,
}

impl RuleCache {
    pub fn new(db: Database, timezone: FixedOffset, policy: CompositionPolicy) -> Self {
        RuleCache {
            db,
            timezone,
            policy,
            slot: RwLock::new(None),
            pricing: RwLock::new(None),
        }
    }

    /// Returns the cached rules, loading them on first use.
    pub async fn get(&self) -> ServiceResult<Arc<DeliveryRules>> {
        if let Some(rules) = self.slot.read().await.as_ref() {
            return Ok(Arc::clone(rules));
        }

        let mut slot = self.slot.write().await;

        // Another task may have loaded while we waited for the write lock
        if let Some(rules) = slot.as_ref() {
            return Ok(Arc::clone(rules));
        }

        let rules = Arc::new(
            self.db
                .load_delivery_rules(self.timezone)
                .await?
                .with_policy(self.policy),
        );
        debug!(policy = %self.policy, "Delivery rules loaded into cache");

        *slot = Some(Arc::clone(&rules));
        Ok(rules)
    }

    /// Returns the cached pricing tables, loading them on first use.
    pub async fn pricing(&self) -> ServiceResult<Arc<PricingTables>> {
        if let Some(tables) = self.pricing.read().await.as_ref() {
            return Ok(Arc::clone(tables));
        }

        let mut slot = self.pricing.write().await;

        if let Some(tables) = slot.as_ref() {
            return Ok(Arc::clone(tables));
        }

        let tables = Arc::new(PricingTables {
            price_list: self
                .db
                .price_list()
                .get()
                .await?
                .unwrap_or_else(defaults::price_list),
            customer_prices: self.db.customer_prices().list().await?,
            volume_tiers: self.db.volume_tiers().list().await?,
        });
        debug!(
            customer_prices = tables.customer_prices.len(),
            volume_tiers = tables.volume_tiers.len(),
            "Pricing tables loaded into cache"
        );

        *slot = Some(Arc::clone(&tables));
        Ok(tables)
    }

    /// Drops the cached delivery rules.
    pub async fn invalidate(&self) {
        if self.slot.write().await.take().is_some() {
            debug!("Delivery rule cache invalidated");
        }
    }

    /// Drops the cached pricing tables.
    pub async fn invalidate_pricing(&self) {
        if self.pricing.write().await.take().is_some() {
            debug!("Pricing cache invalidated");
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    pub async fn is_pricing_loaded(&self) -> bool {
        self.pricing.read().await.is_some()
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    pub fn policy(&self) -> CompositionPolicy {
        self.policy
    }
}
