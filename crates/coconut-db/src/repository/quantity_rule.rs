//! # Quantity Rule Repository
//!
//! Database operations for `quantity_rules`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use coconut_core::{QuantityRule, RuleStatus};

use super::column_u32;
use crate::error::{DbError, DbResult};

const TABLE: &str = "quantity_rules";

#[derive(Debug, sqlx::FromRow)]
struct QuantityRuleRow {
    id: String,
    min_qty: i64,
    max_qty: i64,
    delivery_offset_days: i64,
    status: RuleStatus,
}

impl TryFrom<QuantityRuleRow> for QuantityRule {
    type Error = DbError;

    fn try_from(row: QuantityRuleRow) -> DbResult<Self> {
        Ok(QuantityRule {
            min_qty: column_u32(TABLE, &row.id, "min_qty", row.min_qty)?,
            max_qty: column_u32(TABLE, &row.id, "max_qty", row.max_qty)?,
            delivery_offset_days: column_u32(
                TABLE,
                &row.id,
                "delivery_offset_days",
                row.delivery_offset_days,
            )?,
            status: row.status,
            id: row.id,
        })
    }
}

/// Repository for quantity rules.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.quantity_rules();
/// let rules = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct QuantityRuleRepository {
    pool: SqlitePool,
}

impl QuantityRuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        QuantityRuleRepository { pool }
    }

    /// All rules, active or not, in table order.
    pub async fn list(&self) -> DbResult<Vec<QuantityRule>> {
        let rows = sqlx::query_as::<_, QuantityRuleRow>(
            r#"
            SELECT id, min_qty, max_qty, delivery_offset_days, status
            FROM quantity_rules
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed quantity rules");
        rows.into_iter().map(QuantityRule::try_from).collect()
    }

    /// Gets a rule by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(rule))` - found
    /// * `Ok(None)` - no such ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<QuantityRule>> {
        let row = sqlx::query_as::<_, QuantityRuleRow>(
            r#"
            SELECT id, min_qty, max_qty, delivery_offset_days, status
            FROM quantity_rules
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuantityRule::try_from).transpose()
    }

    /// Inserts a new rule at the end of the table.
    pub async fn insert(&self, rule: &QuantityRule) -> DbResult<QuantityRule> {
        debug!(id = %rule.id, min = rule.min_qty, max = rule.max_qty, "Inserting quantity rule");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO quantity_rules (
                id, min_qty, max_qty, delivery_offset_days, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&rule.id)
        .bind(i64::from(rule.min_qty))
        .bind(i64::from(rule.max_qty))
        .bind(i64::from(rule.delivery_offset_days))
        .bind(rule.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(rule.clone())
    }

    /// Updates an existing rule in place; its table position is kept.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - rule doesn't exist
    pub async fn update(&self, rule: &QuantityRule) -> DbResult<()> {
        debug!(id = %rule.id, "Updating quantity rule");

        let result = sqlx::query(
            r#"
            UPDATE quantity_rules SET
                min_qty = ?2,
                max_qty = ?3,
                delivery_offset_days = ?4,
                status = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&rule.id)
        .bind(i64::from(rule.min_qty))
        .bind(i64::from(rule.max_qty))
        .bind(i64::from(rule.delivery_offset_days))
        .bind(rule.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("QuantityRule", &rule.id));
        }

        Ok(())
    }

    /// Deletes a rule.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quantity rule");

        let result = sqlx::query("DELETE FROM quantity_rules WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("QuantityRule", id));
        }

        Ok(())
    }

    /// Counts all rules, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quantity_rules")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
