//! # Coconut Service
//!
//! Service layer for the Coconut Admin delivery rules.
//!
//! ## Module Structure
//! ```text
//! coconut_service/
//! ├── config.rs           # coconut.toml + COCONUT_* overrides
//! ├── logging.rs          # tracing subscriber
//! ├── cache.rs            # Cached DeliveryRules
//! ├── delivery_service.rs # Quotes and rule-table edits
//! └── error.rs            # ServiceError, ErrorResponse
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use coconut_service::{AppConfig, DeliveryService};
//!
//! # async fn run() -> Result<(), coconut_service::ServiceError> {
//! let config = AppConfig::load(None)?;
//! let service = DeliveryService::from_config(&config).await?;
//!
//! let quote = service.quote(150, "Zone A - Miami Beach", &chrono::Utc::now()).await?;
//! println!("Deliver on {} for {}", quote.promised_date, quote.fee);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod delivery_service;
pub mod error;
pub mod logging;

pub use cache::RuleCache;
pub use config::{AppConfig, ConfigError};
pub use delivery_service::{ConsistencyReport, DeliveryService, OrderQuote};
pub use error::{ErrorCode, ErrorResponse, ServiceError, ServiceResult};
pub use logging::init_tracing;
