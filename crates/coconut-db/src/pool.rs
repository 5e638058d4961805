//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐               │  (max_connections)        │
//! │  │  │Conn1│ │Conn2│ │Conn3│ ...           │                           │
//! │  │  └─────┘ └─────┘ └─────┘               │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.quantity_rules() / db.zone_rules() / db.delivery_zones() / ...     │
//! │  db.load_delivery_rules(tz) → DeliveryRules                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL mode is enabled so quote lookups never wait on an
//! administrator's edit.

use chrono::FixedOffset;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use coconut_core::DeliveryRules;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::delivery_zone::DeliveryZoneRepository;
use crate::repository::pricing::{CustomerPriceRepository, PriceListRepository, VolumeTierRepository};
use crate::repository::quantity_rule::QuantityRuleRepository;
use crate::repository::zone_rule::ZoneRuleRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the rule tables live and how many connections may read them.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/coconut/coconut.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// How long an admin edit waits on a locked file before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// How long a caller waits for a free connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Apply pending migrations in [`Database::new`]. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed configuration; the file is created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Private in-memory database, used by tests.
    ///
    /// Every connection to `:memory:` opens a new empty database, so the
    /// pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(IN_MEMORY)
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let url = if self.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", self.database_path.display())
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true)
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: clones share one pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./coconut.db")).await?;
///
/// let rules = db.quantity_rules().list().await?;
/// let delivery = db.load_delivery_rules(miami).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool (creating the file if needed) and migrates it.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening rule database");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn quantity_rules(&self) -> QuantityRuleRepository {
        QuantityRuleRepository::new(self.pool.clone())
    }

    pub fn zone_rules(&self) -> ZoneRuleRepository {
        ZoneRuleRepository::new(self.pool.clone())
    }

    pub fn delivery_zones(&self) -> DeliveryZoneRepository {
        DeliveryZoneRepository::new(self.pool.clone())
    }

    pub fn volume_tiers(&self) -> VolumeTierRepository {
        VolumeTierRepository::new(self.pool.clone())
    }

    pub fn customer_prices(&self) -> CustomerPriceRepository {
        CustomerPriceRepository::new(self.pool.clone())
    }

    pub fn price_list(&self) -> PriceListRepository {
        PriceListRepository::new(self.pool.clone())
    }

    /// Reads the three delivery tables and builds a validated rule set.
    ///
    /// ## Returns
    /// * `Ok(DeliveryRules)` - ready for evaluation, default composition
    /// * `Err(DbError::InvalidRules)` - a stored row breaks a rule invariant
    /// * `Err(DbError::CorruptRow)` - a stored row cannot be decoded
    pub async fn load_delivery_rules(&self, timezone: FixedOffset) -> DbResult<DeliveryRules> {
        let quantity_rules = self.quantity_rules().list().await?;
        let zone_rules = self.zone_rules().list().await?;
        let zones = self.delivery_zones().list().await?;

        debug!(
            quantity_rules = quantity_rules.len(),
            zone_rules = zone_rules.len(),
            zones = zones.len(),
            "Loaded delivery tables"
        );

        Ok(DeliveryRules::new(quantity_rules, zone_rules, zones, timezone)?)
    }

    /// Closes the pool; later repository calls fail.
    pub async fn close(&self) {
        debug!("Closing rule database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
