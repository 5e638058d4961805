//! # coconut-db: Database Layer for Coconut Admin
//!
//! Stores the delivery and pricing rule tables in SQLite, using sqlx for
//! async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Coconut Admin Data Flow                            │
//! │                                                                         │
//! │  DeliveryService (coconut-service)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    coconut-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repositories    │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │    │ QuantityRuleRepo   │  │            │  │   │
//! │  │   │ SqlitePool    │◄───│ ZoneRuleRepo       │  │ 001_...sql │  │   │
//! │  │   │ load rules    │    │ DeliveryZoneRepo   │  │            │  │   │
//! │  │   │               │    │ pricing repos      │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (coconut.db)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and rule-set loading
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - One repository per rule table
//! - [`seed`] - Default table seeding
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coconut_db::{seed_defaults, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("coconut.db")).await?;
//! seed_defaults(&db).await?;
//!
//! let rules = db.load_delivery_rules(miami).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use seed::{seed_defaults, SeedReport};

pub use repository::delivery_zone::DeliveryZoneRepository;
pub use repository::generate_id;
pub use repository::pricing::{CustomerPriceRepository, PriceListRepository, VolumeTierRepository};
pub use repository::quantity_rule::QuantityRuleRepository;
pub use repository::zone_rule::ZoneRuleRepository;
