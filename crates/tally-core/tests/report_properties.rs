//! End-to-end checks of the seller report against a multi-seller data set.

use serde_json::json;
use tally_core::{
    analyze, analyze_value, AnalysisOptions, LineItem, Money, Product, ProfitBonus, PurchaseRecord,
    ReportRow, ReportSummary, SalesData, Seller, SellerStats, SimpleRevenue, TOP_PRODUCTS_LIMIT,
};

// =============================================================================
// Fixtures
// =============================================================================

fn catalogue() -> Vec<Product> {
    (0..12)
        .map(|i| Product::new(format!("SKU-{i:02}"), 5.0, 20.0))
        .collect()
}

fn sellers(count: usize) -> Vec<Seller> {
    (0..count)
        .map(|i| Seller::new(format!("seller_{i}"), format!("Ann{i}"), "Lee"))
        .collect()
}

/// Six sellers with distinct profits; seller_5 sells the most.
fn market() -> SalesData {
    let mut records = Vec::new();
    for seller in 0..6 {
        for sale in 0..=seller {
            let items = vec![
                LineItem::new(format!("SKU-{:02}", sale % 12), 2, 20.0, 10.0),
                LineItem::new("SKU-00", 1, 20.0, 0.0),
            ];
            records.push(PurchaseRecord::new(format!("seller_{seller}"), 56.0, items));
        }
    }

    SalesData {
        sellers: sellers(6),
        products: catalogue(),
        purchase_records: records,
    }
}

fn report(data: &SalesData) -> Vec<ReportRow> {
    analyze(data, &AnalysisOptions::reference()).expect("valid input")
}

fn row<'a>(rows: &'a [ReportRow], seller_id: &str) -> &'a ReportRow {
    rows.iter()
        .find(|r| r.seller_id == seller_id)
        .expect("seller present")
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_empty_purchase_records_yield_zero_rows() {
    let data = SalesData {
        sellers: sellers(4),
        products: catalogue(),
        purchase_records: vec![],
    };

    let rows = report(&data);
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert_eq!(row.revenue, Money::zero());
        assert_eq!(row.profit, Money::zero());
        assert_eq!(row.sales_count, 0);
        assert_eq!(row.bonus, Money::zero());
        assert!(row.top_products.is_empty());
    }

    let ids: Vec<_> = rows.iter().map(|r| r.seller_id.as_str()).collect();
    assert_eq!(ids, vec!["seller_0", "seller_1", "seller_2", "seller_3"]);
}

#[test]
fn test_sales_count_matches_known_records() {
    let mut data = market();
    let items = vec![LineItem::new("SKU-01", 5, 20.0, 0.0)];
    data.purchase_records
        .push(PurchaseRecord::new("ghost", 999.0, items));

    let known = data
        .purchase_records
        .iter()
        .filter(|r| data.sellers.iter().any(|s| s.id == r.seller_id))
        .count() as u64;

    let summary = ReportSummary::from_rows(&report(&data));
    assert_eq!(summary.sales_count, known);
    assert_eq!(summary.sales_count, 21);
}

#[test]
fn test_rows_sorted_by_profit_descending() {
    let rows = report(&market());
    assert!(rows.windows(2).all(|w| w[0].profit >= w[1].profit));
    assert_eq!(rows[0].seller_id, "seller_5");
    assert_eq!(rows[5].seller_id, "seller_0");
}

#[test]
fn test_bonus_tiers_by_rank() {
    let rows = report(&market());
    let expected =
        |profit: Money, bps: i64| Money::from_decimal(profit.as_decimal() * bps as f64 / 10_000.0);

    assert_eq!(rows[0].bonus, expected(rows[0].profit, 1500));
    assert_eq!(rows[1].bonus, expected(rows[1].profit, 1000));
    assert_eq!(rows[2].bonus, expected(rows[2].profit, 1000));
    assert_eq!(rows[3].bonus, expected(rows[3].profit, 500));
    assert_eq!(rows[4].bonus, expected(rows[4].profit, 500));
    assert_eq!(rows[5].bonus, Money::zero());
    assert!(rows[5].profit.cents() > 0);
}

#[test]
fn test_seller_totals() {
    let rows = report(&market());

    // One sale: 2 × 20 × 0.9 − 2 × 5 = 26, plus 1 × 20 − 5 = 15.
    let first = row(&rows, "seller_0");
    assert_eq!(first.sales_count, 1);
    assert_eq!(first.revenue, Money::from_cents(5600));
    assert_eq!(first.profit, Money::from_cents(4100));

    let top = row(&rows, "seller_5");
    assert_eq!(top.sales_count, 6);
    assert_eq!(top.revenue, Money::from_cents(33600));
    assert_eq!(top.profit, Money::from_cents(24600));
    assert_eq!(top.bonus, Money::from_cents(3690));
}

#[test]
fn test_top_products_bounded_and_sorted() {
    let mut data = market();
    let items: Vec<LineItem> = (0..12)
        .map(|i| LineItem::new(format!("SKU-{i:02}"), 12 - i as i64, 20.0, 0.0))
        .collect();
    data.purchase_records
        .push(PurchaseRecord::new("seller_2", 100.0, items));

    for row in report(&data) {
        assert!(row.top_products.len() <= TOP_PRODUCTS_LIMIT);
        assert!(row
            .top_products
            .windows(2)
            .all(|w| w[0].quantity >= w[1].quantity));
    }

    let rows = report(&data);
    let busy = row(&rows, "seller_2");
    assert_eq!(busy.top_products.len(), TOP_PRODUCTS_LIMIT);
    assert_eq!(busy.top_products[0].sku, "SKU-00");
    assert_eq!(busy.top_products[0].quantity, 2 + 3 + 12);
}

#[test]
fn test_unknown_seller_record_changes_nothing() {
    let baseline = report(&market());

    let mut data = market();
    let items = vec![LineItem::new("SKU-01", 50, 20.0, 0.0)];
    data.purchase_records
        .insert(3, PurchaseRecord::new("nobody", 1_000.0, items));

    assert_eq!(report(&data), baseline);
}

#[test]
fn test_unknown_sku_still_counts_the_record() {
    let data = SalesData {
        sellers: sellers(1),
        products: catalogue(),
        purchase_records: vec![PurchaseRecord::new(
            "seller_0",
            70.0,
            vec![
                LineItem::new("SKU-03", 1, 20.0, 0.0),
                LineItem::new("NOT-IN-CATALOGUE", 9, 50.0, 0.0),
            ],
        )],
    };

    let rows = report(&data);
    let row = &rows[0];
    assert_eq!(row.sales_count, 1);
    assert_eq!(row.revenue, Money::from_cents(7000));
    assert_eq!(row.profit, Money::from_cents(1500));
    assert_eq!(row.top_products.len(), 1);
    assert_eq!(row.top_products[0].sku, "SKU-03");
}

#[test]
fn test_equal_profit_keeps_input_order() {
    let data = SalesData {
        sellers: vec![
            Seller::new("b", "Bea", "B"),
            Seller::new("a", "Al", "A"),
            Seller::new("c", "Cy", "C"),
        ],
        products: catalogue(),
        purchase_records: vec![
            PurchaseRecord::new("a", 20.0, vec![LineItem::new("SKU-01", 1, 20.0, 0.0)]),
            PurchaseRecord::new("b", 20.0, vec![LineItem::new("SKU-02", 1, 20.0, 0.0)]),
        ],
    };

    let ids: Vec<_> = report(&data).into_iter().map(|r| r.seller_id).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn test_invalid_inputs() {
    let options = AnalysisOptions::reference();

    let empty = json!({"sellers": [], "products": [], "purchase_records": []});

    assert!(analyze_value(&serde_json::Value::Null, &options)
        .unwrap_err()
        .is_invalid_data());
    assert!(analyze_value(&empty, &options)
        .unwrap_err()
        .is_invalid_data());
    assert!(analyze(&market(), &AnalysisOptions::default())
        .unwrap_err()
        .is_invalid_options());
}

#[test]
fn test_reference_example_as_json() {
    let doc = json!({
        "sellers": [{"id": 1, "first_name": "Ann", "last_name": "Lee"}],
        "products": [{"sku": "A1", "purchase_price": 10}],
        "purchase_records": [{
            "seller_id": 1,
            "total_amount": 50,
            "items": [{"sku": "A1", "quantity": 2, "sale_price": 30, "discount": 0}]
        }]
    });

    let rows = analyze_value(&doc, &AnalysisOptions::reference()).unwrap();
    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        json!([{
            "seller_id": "1",
            "name": "Ann Lee",
            "revenue": 50.0,
            "profit": 40.0,
            "sales_count": 1,
            "top_products": [{"sku": "A1", "quantity": 2}],
            "bonus": 6.0
        }])
    );
}

#[test]
fn test_custom_strategies() {
    let catalogue_price =
        |item: &LineItem, product: &Product| product.sale_price * item.quantity as f64;
    let flat_bonus = |rank: usize, _total: usize, _seller: &SellerStats| {
        if rank == 0 { 100.0 } else { 10.0 }
    };

    let options = AnalysisOptions::new(catalogue_price, flat_bonus);
    let rows = analyze(&market(), &options).unwrap();
    assert_eq!(rows[0].bonus, Money::from_cents(10000));
    assert!(rows[1..].iter().all(|r| r.bonus == Money::from_cents(1000)));

    // Catalogue price ignores the 10% line discount: 2 × 15 + 15 = 45 per sale.
    assert_eq!(row(&rows, "seller_0").profit, Money::from_cents(4500));
}

#[test]
fn test_builder_equals_reference() {
    let built = AnalysisOptions::default()
        .with_revenue(SimpleRevenue)
        .with_bonus(ProfitBonus::default());
    assert_eq!(analyze(&market(), &built).unwrap(), report(&market()));
}
