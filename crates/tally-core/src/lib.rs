//! # tally-core: Pure Report Logic for Tally
//!
//! This crate turns raw sales logs into a per-seller performance report:
//! revenue, profit, sales count, top products and a rank-based bonus.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-cli (binary: tally)                    │   │
//! │  │    config (TOML + env) ──► load JSON ──► render table / JSON    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ analyze_value(doc, options)            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ strategy  │  │  report   │  │   │
//! │  │   │  Seller   │  │   Money   │  │  Revenue  │  │ analyze   │  │   │
//! │  │   │  Product  │  │   Rate    │  │  Bonus    │  │ Summary   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO SUBSCRIBERS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Input records, the seller accumulator, report rows
//! - [`money`] - Cents-based `Money` and basis-point `Rate`
//! - [`strategy`] - Pluggable revenue and bonus calculations
//! - [`report`] - The aggregator (`analyze`, `analyze_value`)
//! - [`validation`] - Fail-fast input shape checks
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use tally_core::report::{analyze_value, AnalysisOptions};
//!
//! let doc = json!({
//!     "sellers": [{"id": "1", "first_name": "Ann", "last_name": "Lee"}],
//!     "products": [{"sku": "A1", "purchase_price": 10, "sale_price": 30}],
//!     "purchase_records": [{
//!         "seller_id": "1",
//!         "total_amount": 50,
//!         "items": [{"sku": "A1", "quantity": 2, "sale_price": 30, "discount": 0}]
//!     }]
//! });
//!
//! let rows = analyze_value(&doc, &AnalysisOptions::reference()).unwrap();
//! assert_eq!(rows[0].name, "Ann Lee");
//! assert_eq!(rows[0].bonus.to_string(), "$6.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod strategy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ReportError, ReportResult, ValidationError};
pub use money::{Money, Rate};
pub use report::{analyze, analyze_value, AnalysisOptions, ReportSummary};
pub use strategy::{BonusStrategy, ProfitBonus, RevenueStrategy, SimpleRevenue};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of entries in a report row's `top_products`.
pub const TOP_PRODUCTS_LIMIT: usize = 10;
