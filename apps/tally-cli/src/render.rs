//! # Report Rendering
//!
//! Writes report rows as an aligned text table or as JSON.
//!
//! ```text
//! RANK  SELLER     NAME              SALES      REVENUE       PROFIT      BONUS  TOP PRODUCT
//!    1  seller_5   Ann Lee               6      $336.00      $246.00     $36.90  SKU-00 ×11
//!    2  seller_4   Bo Kim                5      $280.00      $205.00     $20.50  SKU-00 ×9
//! ─────────────────────────────────────────────────────────────────────────────────────────
//! TOTAL 2 sellers                       11      $616.00      $451.00     $57.40
//! ```

use std::io::Write;

use tally_core::{ReportRow, ReportSummary};

use crate::config::OutputFormat;
use crate::error::{CliError, CliResult};

/// Writes `rows` to `out` in the requested format.
pub fn render<W: Write>(rows: &[ReportRow], format: OutputFormat, out: &mut W) -> CliResult<()> {
    let written = match format {
        OutputFormat::Table => render_table(rows, out),
        OutputFormat::Json => render_json(rows, out),
    };
    written.map_err(|e| CliError::Output(e.to_string()))
}

fn render_json<W: Write>(rows: &[ReportRow], out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)
}

fn render_table<W: Write>(rows: &[ReportRow], out: &mut W) -> std::io::Result<()> {
    let header = format!(
        "{:>4}  {:<10} {:<16} {:>6} {:>12} {:>12} {:>10}  {}",
        "RANK", "SELLER", "NAME", "SALES", "REVENUE", "PROFIT", "BONUS", "TOP PRODUCT"
    );
    writeln!(out, "{}", header)?;

    for (rank, row) in rows.iter().enumerate() {
        let top = row
            .top_products
            .first()
            .map(|p| format!("{} ×{}", p.sku, p.quantity))
            .unwrap_or_else(|| "-".to_string());

        writeln!(
            out,
            "{:>4}  {:<10} {:<16} {:>6} {:>12} {:>12} {:>10}  {}",
            rank + 1,
            row.seller_id,
            row.name,
            row.sales_count,
            row.revenue.to_string(),
            row.profit.to_string(),
            row.bonus.to_string(),
            top
        )?;
    }

    let summary = ReportSummary::from_rows(rows);
    writeln!(out, "{}", "─".repeat(header.chars().count()))?;
    writeln!(
        out,
        "{:<33} {:>6} {:>12} {:>12} {:>10}",
        format!("TOTAL {} sellers", summary.sellers),
        summary.sales_count,
        summary.revenue.to_string(),
        summary.profit.to_string(),
        summary.bonus.to_string()
    )
}
