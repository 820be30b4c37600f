//! # Validation Module
//!
//! Input shape checks that run before any aggregation.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fail-Fast Checks                                   │
//! │                                                                         │
//! │  1. data               object?                 ──► InvalidData          │
//! │  2. data.sellers       array? non-empty?       ──► InvalidData          │
//! │  3. data.products      array? non-empty?       ──► InvalidData          │
//! │  4. data.purchase_records   array?             ──► InvalidData          │
//! │  5. options.calculate_revenue  present?        ──► InvalidOptions       │
//! │  6. options.calculate_bonus    present?        ──► InvalidOptions       │
//! │                                                                         │
//! │  The first failing check is reported. Nothing is folded on failure.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Typed [`SalesData`] already guarantees steps 1 and 4 and the array shape of
//! 2 and 3, so [`validate_sales_data`] only checks emptiness.
//! [`validate_document`] runs the full list against untyped JSON.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::SalesData;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const FIELD_DATA: &str = "data";
pub const FIELD_SELLERS: &str = "sellers";
pub const FIELD_PRODUCTS: &str = "products";
pub const FIELD_PURCHASE_RECORDS: &str = "purchase_records";
pub const FIELD_REVENUE: &str = "calculate_revenue";
pub const FIELD_BONUS: &str = "calculate_bonus";

// =============================================================================
// Typed Input
// =============================================================================

/// Validates a typed input document.
///
/// ## Rules
/// - `sellers` must not be empty
/// - `products` must not be empty
/// - `purchase_records` may be empty
pub fn validate_sales_data(data: &SalesData) -> ValidationResult<()> {
    require_non_empty(FIELD_SELLERS, data.sellers.len())?;
    require_non_empty(FIELD_PRODUCTS, data.products.len())?;
    Ok(())
}

fn require_non_empty(field: &str, len: usize) -> ValidationResult<()> {
    if len == 0 {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Untyped Input
// =============================================================================

/// Validates the shape of an untyped input document.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use tally_core::validation::validate_document;
///
/// assert!(validate_document(&json!(null)).is_err());
/// assert!(validate_document(&json!({"sellers": [], "products": [{}], "purchase_records": []})).is_err());
/// assert!(validate_document(&json!({"sellers": [{}], "products": [{}], "purchase_records": []})).is_ok());
/// ```
pub fn validate_document(data: &Value) -> ValidationResult<()> {
    let object = match data {
        Value::Object(map) => map,
        Value::Null => {
            return Err(ValidationError::Required {
                field: FIELD_DATA.to_string(),
            })
        }
        _ => {
            return Err(ValidationError::NotAnObject {
                field: FIELD_DATA.to_string(),
            })
        }
    };

    let sellers = require_array(FIELD_SELLERS, object.get(FIELD_SELLERS))?;
    require_non_empty(FIELD_SELLERS, sellers.len())?;

    let products = require_array(FIELD_PRODUCTS, object.get(FIELD_PRODUCTS))?;
    require_non_empty(FIELD_PRODUCTS, products.len())?;

    require_array(FIELD_PURCHASE_RECORDS, object.get(FIELD_PURCHASE_RECORDS))?;

    Ok(())
}

fn require_array<'a>(field: &str, value: Option<&'a Value>) -> ValidationResult<&'a Vec<Value>> {
    match value {
        Some(Value::Array(items)) => Ok(items),
        None | Some(Value::Null) => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(_) => Err(ValidationError::NotASequence {
            field: field.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
