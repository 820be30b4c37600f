//! # Error Types
//!
//! Error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ReportError      - What `analyze` returns                         │
//! │  │   ├── InvalidData     (sellers / products / purchase_records)       │
//! │  │   └── InvalidOptions  (revenue / bonus strategy)                    │
//! │  └── ValidationError  - Which check failed, and on which field         │
//! │                                                                         │
//! │  tally-cli errors (separate crate)                                     │
//! │  └── CliError         - Config, file and JSON failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → ReportError → CliError → exit status          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown seller ids and SKUs inside purchase records are NOT errors; they
//! are skipped by the aggregator.

use thiserror::Error;

// =============================================================================
// Report Error
// =============================================================================

/// Errors returned by the report entry points.
///
/// Both variants are raised before any purchase record is folded, so a
/// failed call never produces a partial report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input document is missing or has the wrong shape.
    ///
    /// ## When This Occurs
    /// - Input is `null` or not an object
    /// - `sellers` or `products` is missing, not an array, or empty
    /// - `purchase_records` is missing or not an array
    /// - A record cannot be read into its typed form
    #[error("Invalid input data: {0}")]
    InvalidData(ValidationError),

    /// The analysis options are incomplete.
    ///
    /// ## When This Occurs
    /// - The revenue strategy is absent
    /// - The bonus strategy is absent
    #[error("Invalid analysis options: {0}")]
    InvalidOptions(ValidationError),
}

impl ReportError {
    /// Returns true for data shape failures.
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, ReportError::InvalidData(_))
    }

    /// Returns true for missing strategies.
    pub fn is_invalid_options(&self) -> bool {
        matches!(self, ReportError::InvalidOptions(_))
    }

    /// The underlying validation failure.
    pub fn validation(&self) -> &ValidationError {
        match self {
            ReportError::InvalidData(e) | ReportError::InvalidOptions(e) => e,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field or value is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// A sequence that must hold at least one entry is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Value must be a structured object.
    #[error("{field} must be an object")]
    NotAnObject { field: String },

    /// Value must be a sequence.
    #[error("{field} must be an array")]
    NotASequence { field: String },

    /// Value has the right container shape but its contents do not parse.
    #[error("{field} is malformed: {reason}")]
    Malformed { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field the check failed on.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Empty { field }
            | ValidationError::NotAnObject { field }
            | ValidationError::NotASequence { field }
            | ValidationError::Malformed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ReportError.
pub type ReportResult<T> = Result<T, ReportError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReportError::InvalidData(ValidationError::Empty {
            field: "sellers".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid input data: sellers must not be empty"
        );

        let err = ReportError::InvalidOptions(ValidationError::Required {
            field: "calculate_bonus".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid analysis options: calculate_bonus is required"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NotASequence {
            field: "purchase_records".to_string(),
        };
        assert_eq!(err.to_string(), "purchase_records must be an array");

        let err = ValidationError::Malformed {
            field: "products".to_string(),
            reason: "missing field `sku`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "products is malformed: missing field `sku`"
        );
    }

    #[test]
    fn test_error_kinds_are_distinguishable() {
        let data = ReportError::InvalidData(ValidationError::NotAnObject {
            field: "data".to_string(),
        });
        let options = ReportError::InvalidOptions(ValidationError::Required {
            field: "calculate_revenue".to_string(),
        });

        assert!(data.is_invalid_data());
        assert!(!data.is_invalid_options());
        assert!(options.is_invalid_options());
        assert_eq!(options.validation().field(), "calculate_revenue");
    }
}
