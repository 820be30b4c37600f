//! # Seller Report Aggregator
//!
//! Joins sellers, products and purchase records into one row per seller.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        analyze(data, options)                           │
//! │                                                                         │
//! │  validate ──► index ──► fold records ──► rank ──► finalize ──► rows    │
//! │     │           │            │             │          │                 │
//! │     │           │            │             │          └─ bonus, top 10  │
//! │     │           │            │             │             round to cents │
//! │     │           │            │             └─ stable sort, profit desc  │
//! │     │           │            └─ unknown seller / SKU: skipped           │
//! │     │           └─ seller id → accumulator, SKU → product               │
//! │     └─ InvalidData / InvalidOptions, nothing folded                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use tally_core::report::{analyze, AnalysisOptions};
//! use tally_core::{LineItem, Money, Product, PurchaseRecord, SalesData, Seller};
//!
//! let data = SalesData {
//!     sellers: vec![Seller::new("1", "Ann", "Lee")],
//!     products: vec![Product::new("A1", 10.0, 30.0)],
//!     purchase_records: vec![PurchaseRecord::new(
//!         "1",
//!         50.0,
//!         vec![LineItem::new("A1", 2, 30.0, 0.0)],
//!     )],
//! };
//!
//! let rows = analyze(&data, &AnalysisOptions::reference()).unwrap();
//! assert_eq!(rows[0].profit, Money::from_cents(4000));
//! assert_eq!(rows[0].bonus, Money::from_cents(600));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ReportError, ReportResult, ValidationError};
use crate::money::{self, Money};
use crate::strategy::{BonusStrategy, ProfitBonus, RevenueStrategy, SimpleRevenue};
use crate::types::{Product, ReportRow, SalesData, SellerStats};
use crate::validation::{self, FIELD_BONUS, FIELD_DATA, FIELD_REVENUE};
use crate::TOP_PRODUCTS_LIMIT;

// =============================================================================
// Analysis Options
// =============================================================================

/// The two strategies a report is computed with.
///
/// Both must be set; [`analyze`] rejects options with either one missing.
#[derive(Default)]
pub struct AnalysisOptions {
    calculate_revenue: Option<Box<dyn RevenueStrategy>>,
    calculate_bonus: Option<Box<dyn BonusStrategy>>,
}

impl AnalysisOptions {
    pub fn new<R, B>(revenue: R, bonus: B) -> Self
    where
        R: RevenueStrategy + 'static,
        B: BonusStrategy + 'static,
    {
        AnalysisOptions {
            calculate_revenue: Some(Box::new(revenue)),
            calculate_bonus: Some(Box::new(bonus)),
        }
    }

    /// [`SimpleRevenue`] with the default [`ProfitBonus`] tiers.
    pub fn reference() -> Self {
        Self::new(SimpleRevenue, ProfitBonus::default())
    }

    pub fn with_revenue<R: RevenueStrategy + 'static>(mut self, revenue: R) -> Self {
        self.calculate_revenue = Some(Box::new(revenue));
        self
    }

    pub fn with_bonus<B: BonusStrategy + 'static>(mut self, bonus: B) -> Self {
        self.calculate_bonus = Some(Box::new(bonus));
        self
    }

    /// Returns both strategies, or the first missing one as an error.
    fn strategies(&self) -> ReportResult<(&dyn RevenueStrategy, &dyn BonusStrategy)> {
        let revenue = self
            .calculate_revenue
            .as_deref()
            .ok_or_else(|| missing_option(FIELD_REVENUE))?;
        let bonus = self
            .calculate_bonus
            .as_deref()
            .ok_or_else(|| missing_option(FIELD_BONUS))?;
        Ok((revenue, bonus))
    }
}

impl fmt::Debug for AnalysisOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOptions")
            .field("calculate_revenue", &self.calculate_revenue.is_some())
            .field("calculate_bonus", &self.calculate_bonus.is_some())
            .finish()
    }
}

fn missing_option(field: &str) -> ReportError {
    ReportError::InvalidOptions(ValidationError::Required {
        field: field.to_string(),
    })
}

// =============================================================================
// Entry Points
// =============================================================================

/// Builds the seller report from typed input.
///
/// ## Errors
/// - [`ReportError::InvalidData`] if `sellers` or `products` is empty
/// - [`ReportError::InvalidOptions`] if a strategy is missing
///
/// A panicking strategy unwinds through this call unchanged.
pub fn analyze(data: &SalesData, options: &AnalysisOptions) -> ReportResult<Vec<ReportRow>> {
    validation::validate_sales_data(data).map_err(ReportError::InvalidData)?;
    let (revenue, bonus) = options.strategies()?;
    Ok(aggregate(data, revenue, bonus))
}

/// Builds the seller report from an untyped JSON document.
///
/// Runs every shape check [`validation::validate_document`] knows, then the
/// option checks, and only then reads the records. A record that does not
/// parse is reported as [`ReportError::InvalidData`].
pub fn analyze_value(data: &Value, options: &AnalysisOptions) -> ReportResult<Vec<ReportRow>> {
    validation::validate_document(data).map_err(ReportError::InvalidData)?;
    let (revenue, bonus) = options.strategies()?;

    let data = SalesData::deserialize(data).map_err(|e| {
        ReportError::InvalidData(ValidationError::Malformed {
            field: FIELD_DATA.to_string(),
            reason: e.to_string(),
        })
    })?;

    Ok(aggregate(&data, revenue, bonus))
}

// =============================================================================
// Aggregation
// =============================================================================

fn aggregate(
    data: &SalesData,
    revenue_strategy: &dyn RevenueStrategy,
    bonus_strategy: &dyn BonusStrategy,
) -> Vec<ReportRow> {
    let mut stats: Vec<SellerStats> = data.sellers.iter().map(SellerStats::new).collect();

    // Duplicate seller ids resolve to the last occurrence.
    let seller_index: HashMap<&str, usize> = data
        .sellers
        .iter()
        .enumerate()
        .map(|(idx, seller)| (seller.id.as_str(), idx))
        .collect();

    let product_index: HashMap<&str, &Product> = data
        .products
        .iter()
        .map(|product| (product.sku.as_str(), product))
        .collect();

    let mut skipped_records = 0usize;
    let mut skipped_items = 0usize;

    for record in &data.purchase_records {
        let Some(&idx) = seller_index.get(record.seller_id.as_str()) else {
            debug!(seller_id = %record.seller_id, "Skipping record for unknown seller");
            skipped_records += 1;
            continue;
        };
        let seller = &mut stats[idx];
        seller.record_sale(record.total_amount);

        for item in &record.items {
            let Some(product) = product_index.get(item.sku.as_str()) else {
                debug!(
                    seller_id = %record.seller_id,
                    sku = %item.sku,
                    "Skipping line item for unknown product"
                );
                skipped_items += 1;
                continue;
            };

            let cost = product.cost(item.quantity);
            let revenue = revenue_strategy.revenue(item, product);
            seller.record_item(&item.sku, item.quantity, revenue - cost);
        }
    }

    // Stable: equal profit keeps input order.
    stats.sort_by(|a, b| b.profit.total_cmp(&a.profit));

    let total = stats.len();
    let rows: Vec<ReportRow> = stats
        .iter()
        .enumerate()
        .map(|(rank, seller)| finalize(seller, bonus_strategy.bonus(rank, total, seller)))
        .collect();

    info!(
        sellers = total,
        records = data.purchase_records.len(),
        skipped_records,
        skipped_items,
        "Seller report built"
    );

    rows
}

fn finalize(seller: &SellerStats, bonus: f64) -> ReportRow {
    ReportRow {
        seller_id: seller.seller_id.clone(),
        name: seller.name.clone(),
        revenue: Money::from_decimal(seller.revenue),
        profit: Money::from_decimal(seller.profit),
        sales_count: seller.sales_count,
        top_products: seller.top_products(TOP_PRODUCTS_LIMIT),
        bonus: Money::from_decimal(bonus),
    }
}

// =============================================================================
// Report Summary
// =============================================================================

/// Totals across all rows of a report.
///
/// Money fields serialise as decimals, like [`ReportRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportSummary {
    pub sellers: usize,
    pub sales_count: u64,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub revenue: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub profit: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub bonus: Money,
}

impl ReportSummary {
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        ReportSummary {
            sellers: rows.len(),
            sales_count: rows.iter().map(|row| row.sales_count).sum(),
            revenue: rows.iter().map(|row| row.revenue).sum(),
            profit: rows.iter().map(|row| row.profit).sum(),
            bonus: rows.iter().map(|row| row.bonus).sum(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
