//! # Delivery Zone Repository
//!
//! Database operations for `delivery_zones`, the per-zone delivery fees.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use coconut_core::{DeliveryZone, Money, RuleStatus};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct DeliveryZoneRow {
    id: String,
    name: String,
    fee_cents: i64,
    description: Option<String>,
    status: RuleStatus,
}

impl From<DeliveryZoneRow> for DeliveryZone {
    fn from(row: DeliveryZoneRow) -> Self {
        DeliveryZone {
            id: row.id,
            name: row.name,
            fee: Money::from_cents(row.fee_cents),
            description: row.description,
            status: row.status,
        }
    }
}

/// Repository for delivery zones and their fees.
#[derive(Debug, Clone)]
pub struct DeliveryZoneRepository {
    pool: SqlitePool,
}

impl DeliveryZoneRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryZoneRepository { pool }
    }

    /// All zones in table order.
    pub async fn list(&self) -> DbResult<Vec<DeliveryZone>> {
        let rows = sqlx::query_as::<_, DeliveryZoneRow>(
            r#"
            SELECT id, name, fee_cents, description, status
            FROM delivery_zones
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed delivery zones");
        Ok(rows.into_iter().map(DeliveryZone::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DeliveryZone>> {
        let row = sqlx::query_as::<_, DeliveryZoneRow>(
            r#"
            SELECT id, name, fee_cents, description, status
            FROM delivery_zones
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DeliveryZone::from))
    }

    /// Gets a zone by exact name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<DeliveryZone>> {
        let row = sqlx::query_as::<_, DeliveryZoneRow>(
            r#"
            SELECT id, name, fee_cents, description, status
            FROM delivery_zones
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DeliveryZone::from))
    }

    /// Inserts a new zone.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - a zone with this name exists
    pub async fn insert(&self, zone: &DeliveryZone) -> DbResult<DeliveryZone> {
        debug!(zone = %zone.name, fee = %zone.fee, "Inserting delivery zone");

        sqlx::query(
            r#"
            INSERT INTO delivery_zones (
                id, name, fee_cents, description, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&zone.id)
        .bind(&zone.name)
        .bind(zone.fee.cents())
        .bind(&zone.description)
        .bind(zone.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &zone.name),
            other => other,
        })?;

        Ok(zone.clone())
    }

    pub async fn update(&self, zone: &DeliveryZone) -> DbResult<()> {
        debug!(id = %zone.id, zone = %zone.name, "Updating delivery zone");

        let result = sqlx::query(
            r#"
            UPDATE delivery_zones SET
                name = ?2,
                fee_cents = ?3,
                description = ?4,
                status = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&zone.id)
        .bind(&zone.name)
        .bind(zone.fee.cents())
        .bind(&zone.description)
        .bind(zone.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DeliveryZone", &zone.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting delivery zone");

        let result = sqlx::query("DELETE FROM delivery_zones WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DeliveryZone", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM delivery_zones")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::generate_id;
    use crate::{Database, DbConfig};

    fn zone(name: &str, cents: i64) -> DeliveryZone {
        DeliveryZone {
            id: generate_id(),
            name: name.to_string(),
            fee: Money::from_cents(cents),
            description: None,
            status: RuleStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_insert_get_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.delivery_zones();

        let mut z = repo.insert(&zone("Zone B - Downtown", 750)).await.unwrap();
        z.fee = Money::from_cents(800);
        z.description = Some("Brickell".to_string());
        repo.update(&z).await.unwrap();

        let fetched = repo.get_by_name("Zone B - Downtown").await.unwrap().unwrap();
        assert_eq!(fetched, z);
        assert_eq!(repo.get_by_id(&z.id).await.unwrap(), Some(z));
    }

    #[tokio::test]
    async fn test_negative_fee_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db.delivery_zones().insert(&zone("Zone X", -1)).await;
        assert!(matches!(result, Err(DbError::ConstraintViolation { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_zone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db.delivery_zones().delete("nope").await;
        assert!(matches!(result, Err(DbError::NotFound { entity, .. }) if entity == "DeliveryZone"));
    }
}
