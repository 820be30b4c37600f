//! # Domain Types
//!
//! Input records, the per-seller accumulator and the report row.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (owned by the caller, read-only)                                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │     Seller      │   │     Product     │   │   PurchaseRecord    │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  sku            │   │  seller_id ──► id   │   │
//! │  │  first_name     │   │  purchase_price │   │  total_amount       │   │
//! │  │  last_name      │   │  sale_price     │   │  items: LineItem[]  │   │
//! │  └─────────────────┘   └─────────────────┘   │    sku ──► sku      │   │
//! │                                              └─────────────────────┘   │
//! │                                                                         │
//! │  WORKING STATE              OUTPUT                                      │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │  SellerStats    │ ─────► │   ReportRow     │  Money rounded to      │
//! │  │  (f64 sums)     │        │  (immutable)    │  cents, top 10 SKUs    │
//! │  └─────────────────┘        └─────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are strings. Exports that carry numeric ids (`"id": 1`) are
//! accepted and read as `"1"`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};

// =============================================================================
// Seller
// =============================================================================

/// A seller as it appears in the input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    /// Seller identifier, referenced by `PurchaseRecord::seller_id`.
    #[serde(deserialize_with = "id_string::deserialize")]
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    /// Hire date, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Job title, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Seller {
    /// Creates a seller with only the fields the report needs.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Seller {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            start_date: None,
            position: None,
        }
    }

    /// Display name: first and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalogue entry, looked up by SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stock Keeping Unit - join key for line items.
    #[serde(deserialize_with = "id_string::deserialize")]
    pub sku: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Cost basis per unit.
    pub purchase_price: f64,

    /// Catalogue price per unit. Line items carry their own sale price.
    #[serde(default)]
    pub sale_price: f64,
}

impl Product {
    pub fn new(sku: impl Into<String>, purchase_price: f64, sale_price: f64) -> Self {
        Product {
            sku: sku.into(),
            name: String::new(),
            category: None,
            purchase_price,
            sale_price,
        }
    }

    /// Cost of `quantity` units at the purchase price.
    #[inline]
    pub fn cost(&self, quantity: i64) -> f64 {
        self.purchase_price * quantity as f64
    }
}

// =============================================================================
// Purchase Record
// =============================================================================

/// One product entry inside a purchase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(deserialize_with = "id_string::deserialize")]
    pub sku: String,

    pub quantity: i64,

    /// Unit price at time of sale.
    pub sale_price: f64,

    /// Discount percentage (5 = 5%).
    #[serde(default)]
    pub discount: f64,
}

impl LineItem {
    pub fn new(sku: impl Into<String>, quantity: i64, sale_price: f64, discount: f64) -> Self {
        LineItem {
            sku: sku.into(),
            quantity,
            sale_price,
            discount,
        }
    }
}

/// A single transaction (receipt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(deserialize_with = "id_string::deserialize")]
    pub seller_id: String,

    #[serde(
        default,
        deserialize_with = "id_string::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<String>,

    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Amount charged for the whole receipt. Feeds seller revenue as-is.
    pub total_amount: f64,

    #[serde(default)]
    pub total_discount: f64,
}

impl PurchaseRecord {
    pub fn new(seller_id: impl Into<String>, total_amount: f64, items: Vec<LineItem>) -> Self {
        PurchaseRecord {
            receipt_id: None,
            date: None,
            seller_id: seller_id.into(),
            customer_id: None,
            items,
            total_amount,
            total_discount: 0.0,
        }
    }
}

// =============================================================================
// Sales Data
// =============================================================================

/// The complete input document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesData {
    pub sellers: Vec<Seller>,
    pub products: Vec<Product>,
    pub purchase_records: Vec<PurchaseRecord>,
}

// =============================================================================
// Seller Stats (accumulator)
// =============================================================================

/// Quantity of one SKU sold by a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub sku: String,
    pub quantity: i64,
}

/// Per-seller working state during aggregation.
///
/// Sums stay in `f64` until the report row is emitted. Sold quantities are
/// kept in first-sold order so equal quantities rank deterministically.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerStats {
    pub seller_id: String,
    pub name: String,
    /// Sum of `total_amount` over the seller's records.
    pub revenue: f64,
    /// Sum of `revenue - cost` over the seller's known line items.
    pub profit: f64,
    /// Number of records attributed to the seller.
    pub sales_count: u64,
    products_sold: Vec<ProductSales>,
    sku_index: HashMap<String, usize>,
}

impl SellerStats {
    /// Creates a zeroed accumulator for a seller.
    pub fn new(seller: &Seller) -> Self {
        SellerStats {
            seller_id: seller.id.clone(),
            name: seller.full_name(),
            revenue: 0.0,
            profit: 0.0,
            sales_count: 0,
            products_sold: Vec::new(),
            sku_index: HashMap::new(),
        }
    }

    /// Folds in a receipt header.
    pub(crate) fn record_sale(&mut self, total_amount: f64) {
        self.sales_count += 1;
        self.revenue += total_amount;
    }

    /// Folds in a line item whose product is known.
    pub(crate) fn record_item(&mut self, sku: &str, quantity: i64, profit: f64) {
        self.profit += profit;

        match self.sku_index.get(sku) {
            Some(&idx) => self.products_sold[idx].quantity += quantity,
            None => {
                self.sku_index
                    .insert(sku.to_string(), self.products_sold.len());
                self.products_sold.push(ProductSales {
                    sku: sku.to_string(),
                    quantity,
                });
            }
        }
    }

    /// Cumulative quantities per SKU, in first-sold order.
    pub fn products_sold(&self) -> &[ProductSales] {
        &self.products_sold
    }

    /// The `limit` SKUs with the highest quantity, descending.
    ///
    /// The sort is stable, so equal quantities keep first-sold order.
    pub fn top_products(&self, limit: usize) -> Vec<ProductSales> {
        let mut ranked = self.products_sold.clone();
        ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        ranked.truncate(limit);
        ranked
    }
}

// =============================================================================
// Report Row
// =============================================================================

/// One seller's line in the finished report.
///
/// `seller_id` is always a string. A seller whose input id was a JSON number
/// (`"id": 1`) is reported as `"seller_id": "1"`, so consumers should compare
/// ids as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportRow {
    pub seller_id: String,
    pub name: String,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub revenue: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub profit: Money,
    pub sales_count: u64,
    pub top_products: Vec<ProductSales>,
    #[serde(with = "money::decimal")]
    #[ts(type = "number")]
    pub bonus: Money,
}

// =============================================================================
// Identifier Deserialization
// =============================================================================

/// Reads an identifier that may be a JSON string or number.
mod id_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Text(s) => s,
                RawId::Int(n) => n.to_string(),
                RawId::Float(n) => n.to_string(),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(String::from)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
