//! # coconut-core: Pure Delivery Rules for Coconut Admin
//!
//! This crate holds the business rules behind the delivery-rules and pricing
//! screens as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Coconut Admin Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin frontend (TypeScript)                  │   │
//! │  │   Quantity rules ── Zone rules ── Delivery zones ── Pricing     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                coconut-service (config, cache)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ coconut-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐     │   │
//! │  │   │ delivery │  │ pricing  │  │  money   │  │ validation │     │   │
//! │  │   │ offsets  │  │  tiers   │  │  Money   │  │   drafts   │     │   │
//! │  │   │ zone fee │  │ customer │  │          │  │   errors   │     │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 coconut-db (SQLite rule tables)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Rule records (QuantityRule, ZoneRule, DeliveryZone, ...)
//! - [`delivery`] - Offset and fee resolution, quote composition
//! - [`pricing`] - Volume discounts and customer-specific prices
//! - [`money`] - Integer-cent Money type
//! - [`schedule`] - Cutoff time parsing and display
//! - [`validation`] - Typed drafts and field-level validation
//! - [`defaults`] - Seed tables shipped with a fresh install
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use coconut_core::defaults;
//! use coconut_core::delivery::OrderRequest;
//!
//! let rules = defaults::delivery_rules(FixedOffset::west_opt(5 * 3600).unwrap()).unwrap();
//! let submitted_at = rules.timezone().with_ymd_and_hms(2026, 3, 2, 13, 30, 0).unwrap();
//!
//! let quote = rules
//!     .quote(&OrderRequest::new(150, "Zone A - Miami Beach", submitted_at))
//!     .unwrap();
//!
//! // 150 units → 2 days; before the 14:00 cutoff → 1 day; max wins
//! assert_eq!(quote.offset_days, 2);
//! assert_eq!(quote.fee.cents(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod defaults;
pub mod delivery;
pub mod error;
pub mod money;
pub mod pricing;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use delivery::{CompositionPolicy, DeliveryQuote, DeliveryRules, Fallback, OrderRequest};
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest delivery promise an administrator may configure, in days.
pub const MAX_OFFSET_DAYS: u32 = 60;

/// Maximum length of zone and customer names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum discount expressible in basis points (100%).
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Largest fee or price an administrator may enter: $1,000,000.00.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;
