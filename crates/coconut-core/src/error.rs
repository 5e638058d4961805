//! # Error Types
//!
//! Domain-specific error types for coconut-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  coconut-core errors (this file)                                       │
//! │  ├── CoreError         - Rule evaluation and configuration errors      │
//! │  ├── ValidationError   - One field failed validation                   │
//! │  └── ValidationErrors  - Every field error of one form submission      │
//! │                                                                         │
//! │  coconut-db errors (separate crate)                                    │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  coconut-service errors                                                │
//! │  └── ServiceError      - What the caller sees                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while evaluating or building delivery rules.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No active quantity rule covers the order quantity.
    ///
    /// ## When This Occurs
    /// - Quantity is above the largest configured range (301 with the defaults)
    /// - The covering rule exists but is inactive
    #[error("No delivery rule covers a quantity of {quantity}")]
    NoMatchingRule { quantity: u32 },

    /// The zone is not present in the zone-rule or zone-fee table.
    #[error("Unknown delivery zone: {zone}")]
    UnknownZone { zone: String },

    /// A rule table failed validation when the rule set was built.
    #[error("Invalid rule configuration: {0}")]
    InvalidRuleConfiguration(ValidationErrors),

    /// Caller input failed validation (e.g., zero quantity).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an UnknownZone error.
    pub fn unknown_zone(zone: impl Into<String>) -> Self {
        CoreError::UnknownZone { zone: zone.into() }
    }

    /// Returns true for lookup misses a serving layer may cover with a
    /// configured default offset or fee.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::NoMatchingRule { .. } | CoreError::UnknownZone { .. }
        )
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::InvalidRuleConfiguration(errors)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., cutoff time that is not HH:MM).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Lower bound is not below the upper bound.
    ///
    /// ## User Workflow
    /// ```text
    /// Add quantity rule: min 200, max 100
    ///      │
    ///      ▼
    /// InvalidRange { min_field: "min_qty", max_field: "max_qty" }
    ///      │
    ///      ▼
    /// UI shows: "min_qty must be less than max_qty"
    /// ```
    #[error("{min_field} must be less than {max_field}")]
    InvalidRange { min_field: String, max_field: String },

    /// Removing the item would leave an empty table.
    #[error("at least one {entity} is required")]
    LastRemaining { entity: String },
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::InvalidRange { min_field, .. } => min_field,
            ValidationError::LastRemaining { entity } => entity,
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// All field errors collected from one validation pass.
///
/// Forms show every failing field at once, so validators collect instead of
/// stopping at the first problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Errors attached to the given field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field() == field)
    }

    /// Merges errors from a nested record, prefixing field names.
    ///
    /// Used for table-level validation: `quantity_rules[2].min_qty`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.0 {
            self.0.push(prefix_field(prefix, error));
        }
    }

    /// `Ok(value)` if nothing was collected, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn prefix_field(prefix: &str, error: ValidationError) -> ValidationError {
    let p = |field: String| format!("{}.{}", prefix, field);
    match error {
        ValidationError::Required { field } => ValidationError::Required { field: p(field) },
        ValidationError::TooLong { field, max } => ValidationError::TooLong { field: p(field), max },
        ValidationError::OutOfRange { field, min, max } => ValidationError::OutOfRange {
            field: p(field),
            min,
            max,
        },
        ValidationError::MustBePositive { field } => {
            ValidationError::MustBePositive { field: p(field) }
        }
        ValidationError::InvalidFormat { field, reason } => ValidationError::InvalidFormat {
            field: p(field),
            reason,
        },
        ValidationError::InvalidRange {
            min_field,
            max_field,
        } => ValidationError::InvalidRange {
            min_field: p(min_field),
            max_field: p(max_field),
        },
        ValidationError::LastRemaining { entity } => ValidationError::LastRemaining { entity },
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
