//! # Pricing Repositories
//!
//! Database operations for `volume_tiers`, `customer_prices` and the
//! single-row `price_list`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use coconut_core::{CustomerPrice, Money, PriceList, UnitType, VolumeTier};

use super::column_u32;
use crate::error::{DbError, DbResult};

// =============================================================================
// Volume Tiers
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct VolumeTierRow {
    id: String,
    min_qty: i64,
    max_qty: i64,
    discount_bps: i64,
}

impl TryFrom<VolumeTierRow> for VolumeTier {
    type Error = DbError;

    fn try_from(row: VolumeTierRow) -> DbResult<Self> {
        const TABLE: &str = "volume_tiers";
        Ok(VolumeTier {
            min_qty: column_u32(TABLE, &row.id, "min_qty", row.min_qty)?,
            max_qty: column_u32(TABLE, &row.id, "max_qty", row.max_qty)?,
            discount_bps: column_u32(TABLE, &row.id, "discount_bps", row.discount_bps)?,
            id: row.id,
        })
    }
}

/// Repository for volume discount tiers.
#[derive(Debug, Clone)]
pub struct VolumeTierRepository {
    pool: SqlitePool,
}

impl VolumeTierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VolumeTierRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<VolumeTier>> {
        let rows = sqlx::query_as::<_, VolumeTierRow>(
            "SELECT id, min_qty, max_qty, discount_bps FROM volume_tiers ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VolumeTier::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<VolumeTier>> {
        let row = sqlx::query_as::<_, VolumeTierRow>(
            "SELECT id, min_qty, max_qty, discount_bps FROM volume_tiers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VolumeTier::try_from).transpose()
    }

    pub async fn insert(&self, tier: &VolumeTier) -> DbResult<VolumeTier> {
        debug!(id = %tier.id, bps = tier.discount_bps, "Inserting volume tier");

        sqlx::query(
            r#"
            INSERT INTO volume_tiers (id, min_qty, max_qty, discount_bps, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&tier.id)
        .bind(i64::from(tier.min_qty))
        .bind(i64::from(tier.max_qty))
        .bind(i64::from(tier.discount_bps))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(tier.clone())
    }

    /// Replaces every tier in one transaction, keeping the given order.
    pub async fn replace_all(&self, tiers: &[VolumeTier]) -> DbResult<()> {
        debug!(count = tiers.len(), "Replacing volume tiers");

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        sqlx::query("DELETE FROM volume_tiers")
            .execute(&mut *tx)
            .await?;

        for tier in tiers {
            sqlx::query(
                r#"
                INSERT INTO volume_tiers (id, min_qty, max_qty, discount_bps, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                "#,
            )
            .bind(&tier.id)
            .bind(i64::from(tier.min_qty))
            .bind(i64::from(tier.max_qty))
            .bind(i64::from(tier.discount_bps))
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn update(&self, tier: &VolumeTier) -> DbResult<()> {
        debug!(id = %tier.id, "Updating volume tier");

        let result = sqlx::query(
            r#"
            UPDATE volume_tiers SET
                min_qty = ?2,
                max_qty = ?3,
                discount_bps = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&tier.id)
        .bind(i64::from(tier.min_qty))
        .bind(i64::from(tier.max_qty))
        .bind(i64::from(tier.discount_bps))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("VolumeTier", &tier.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting volume tier");

        let result = sqlx::query("DELETE FROM volume_tiers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("VolumeTier", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM volume_tiers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Customer Prices
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerPriceRow {
    id: String,
    customer_name: String,
    custom_price_cents: i64,
    unit_type: UnitType,
}

impl From<CustomerPriceRow> for CustomerPrice {
    fn from(row: CustomerPriceRow) -> Self {
        CustomerPrice {
            id: row.id,
            customer_name: row.customer_name,
            custom_price: Money::from_cents(row.custom_price_cents),
            unit_type: row.unit_type,
        }
    }
}

/// Repository for negotiated customer prices.
#[derive(Debug, Clone)]
pub struct CustomerPriceRepository {
    pool: SqlitePool,
}

impl CustomerPriceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerPriceRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<CustomerPrice>> {
        let rows = sqlx::query_as::<_, CustomerPriceRow>(
            r#"
            SELECT id, customer_name, custom_price_cents, unit_type
            FROM customer_prices
            ORDER BY customer_name, unit_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CustomerPrice::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CustomerPrice>> {
        let row = sqlx::query_as::<_, CustomerPriceRow>(
            r#"
            SELECT id, customer_name, custom_price_cents, unit_type
            FROM customer_prices
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CustomerPrice::from))
    }

    /// Inserts a negotiated price.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the customer already has a price
    ///   for this unit type
    pub async fn insert(&self, price: &CustomerPrice) -> DbResult<CustomerPrice> {
        debug!(customer = %price.customer_name, "Inserting customer price");

        sqlx::query(
            r#"
            INSERT INTO customer_prices (
                id, customer_name, custom_price_cents, unit_type, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&price.id)
        .bind(&price.customer_name)
        .bind(price.custom_price.cents())
        .bind(price.unit_type)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, &price.customer_name)
            }
            other => other,
        })?;

        Ok(price.clone())
    }

    pub async fn update(&self, price: &CustomerPrice) -> DbResult<()> {
        debug!(id = %price.id, customer = %price.customer_name, "Updating customer price");

        let result = sqlx::query(
            r#"
            UPDATE customer_prices SET
                customer_name = ?2,
                custom_price_cents = ?3,
                unit_type = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&price.id)
        .bind(&price.customer_name)
        .bind(price.custom_price.cents())
        .bind(price.unit_type)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CustomerPrice", &price.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer price");

        let result = sqlx::query("DELETE FROM customer_prices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CustomerPrice", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer_prices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Price List
// =============================================================================

/// Repository for the list prices (one row).
#[derive(Debug, Clone)]
pub struct PriceListRepository {
    pool: SqlitePool,
}

impl PriceListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PriceListRepository { pool }
    }

    /// Returns the stored list prices, or `None` before the first `set`.
    pub async fn get(&self) -> DbResult<Option<PriceList>> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT case_price_cents, unit_price_cents FROM price_list WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(case_cents, unit_cents)| PriceList {
            case_price: Money::from_cents(case_cents),
            unit_price: Money::from_cents(unit_cents),
        }))
    }

    /// Creates or replaces the list prices.
    pub async fn set(&self, list: &PriceList) -> DbResult<()> {
        debug!(case = %list.case_price, unit = %list.unit_price, "Saving price list");

        sqlx::query(
            r#"
            INSERT INTO price_list (id, case_price_cents, unit_price_cents, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                case_price_cents = excluded.case_price_cents,
                unit_price_cents = excluded.unit_price_cents,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(list.case_price.cents())
        .bind(list.unit_price.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
