//! # Zone Rule Repository
//!
//! Database operations for `zone_rules`.
//!
//! Cutoff times are stored as `HH:MM` text, the same format the admin form
//! submits, and parsed back into `NaiveTime` on read.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use coconut_core::schedule::{format_cutoff, parse_cutoff};
use coconut_core::{RuleStatus, ZoneRule};

use super::column_u32;
use crate::error::{DbError, DbResult};

const TABLE: &str = "zone_rules";

#[derive(Debug, sqlx::FromRow)]
struct ZoneRuleRow {
    id: String,
    zone_name: String,
    cutoff_time: String,
    before_cutoff_offset_days: i64,
    after_cutoff_offset_days: i64,
    status: RuleStatus,
}

impl TryFrom<ZoneRuleRow> for ZoneRule {
    type Error = DbError;

    fn try_from(row: ZoneRuleRow) -> DbResult<Self> {
        let cutoff_time =
            parse_cutoff(&row.cutoff_time).map_err(|e| DbError::corrupt(TABLE, &row.id, e))?;

        Ok(ZoneRule {
            before_cutoff_offset_days: column_u32(
                TABLE,
                &row.id,
                "before_cutoff_offset_days",
                row.before_cutoff_offset_days,
            )?,
            after_cutoff_offset_days: column_u32(
                TABLE,
                &row.id,
                "after_cutoff_offset_days",
                row.after_cutoff_offset_days,
            )?,
            cutoff_time,
            zone_name: row.zone_name,
            status: row.status,
            id: row.id,
        })
    }
}

/// Repository for zone cutoff rules.
#[derive(Debug, Clone)]
pub struct ZoneRuleRepository {
    pool: SqlitePool,
}

impl ZoneRuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ZoneRuleRepository { pool }
    }

    /// All zone rules in table order.
    pub async fn list(&self) -> DbResult<Vec<ZoneRule>> {
        let rows = sqlx::query_as::<_, ZoneRuleRow>(
            r#"
            SELECT id, zone_name, cutoff_time,
                   before_cutoff_offset_days, after_cutoff_offset_days, status
            FROM zone_rules
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed zone rules");
        rows.into_iter().map(ZoneRule::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ZoneRule>> {
        let row = sqlx::query_as::<_, ZoneRuleRow>(
            r#"
            SELECT id, zone_name, cutoff_time,
                   before_cutoff_offset_days, after_cutoff_offset_days, status
            FROM zone_rules
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ZoneRule::try_from).transpose()
    }

    /// Gets the rule for a zone by exact name.
    pub async fn get_by_zone_name(&self, zone_name: &str) -> DbResult<Option<ZoneRule>> {
        let row = sqlx::query_as::<_, ZoneRuleRow>(
            r#"
            SELECT id, zone_name, cutoff_time,
                   before_cutoff_offset_days, after_cutoff_offset_days, status
            FROM zone_rules
            WHERE zone_name = ?1
            "#,
        )
        .bind(zone_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ZoneRule::try_from).transpose()
    }

    /// Inserts a new zone rule.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the zone already has a rule
    pub async fn insert(&self, rule: &ZoneRule) -> DbResult<ZoneRule> {
        debug!(zone = %rule.zone_name, "Inserting zone rule");

        sqlx::query(
            r#"
            INSERT INTO zone_rules (
                id, zone_name, cutoff_time,
                before_cutoff_offset_days, after_cutoff_offset_days, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&rule.id)
        .bind(&rule.zone_name)
        .bind(format_cutoff(rule.cutoff_time))
        .bind(i64::from(rule.before_cutoff_offset_days))
        .bind(i64::from(rule.after_cutoff_offset_days))
        .bind(rule.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &rule.zone_name),
            other => other,
        })?;

        Ok(rule.clone())
    }

    pub async fn update(&self, rule: &ZoneRule) -> DbResult<()> {
        debug!(id = %rule.id, zone = %rule.zone_name, "Updating zone rule");

        let result = sqlx::query(
            r#"
            UPDATE zone_rules SET
                zone_name = ?2,
                cutoff_time = ?3,
                before_cutoff_offset_days = ?4,
                after_cutoff_offset_days = ?5,
                status = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&rule.id)
        .bind(&rule.zone_name)
        .bind(format_cutoff(rule.cutoff_time))
        .bind(i64::from(rule.before_cutoff_offset_days))
        .bind(i64::from(rule.after_cutoff_offset_days))
        .bind(rule.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ZoneRule", &rule.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting zone rule");

        let result = sqlx::query("DELETE FROM zone_rules WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ZoneRule", id));
        }

        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zone_rules")
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
    use chrono::NaiveTime;

    fn rule(name: &str, hour: u32) -> ZoneRule {
        ZoneRule {
            id: generate_id(),
            zone_name: name.to_string(),
            cutoff_time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
            before_cutoff_offset_days: 1,
            after_cutoff_offset_days: 2,
            status: RuleStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_cutoff_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.zone_rules();

        let inserted = repo.insert(&rule("Zone A - Miami Beach", 13)).await.unwrap();
        let fetched = repo.get_by_zone_name("Zone A - Miami Beach").await.unwrap().unwrap();

        assert_eq!(fetched, inserted);
        assert_eq!(format_cutoff(fetched.cutoff_time), "13:30");
    }

    #[tokio::test]
    async fn test_duplicate_zone_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.zone_rules();

        repo.insert(&rule("Zone B - Downtown", 12)).await.unwrap();
        let err = repo.insert(&rule("Zone B - Downtown", 9)).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueViolation { value, .. } if value == "Zone B - Downtown"
        ));
    }

    #[tokio::test]
    async fn test_corrupt_cutoff_is_reported() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let r = rule("Zone C - Airport Area", 15);
        db.zone_rules().insert(&r).await.unwrap();

        sqlx::query("UPDATE zone_rules SET cutoff_time = '3pm' WHERE id = ?1")
            .bind(&r.id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.zone_rules().list().await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRow { table: "zone_rules", .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.zone_rules();
        let r = repo.insert(&rule("Zone A - Miami Beach", 14)).await.unwrap();

        repo.delete(&r.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
