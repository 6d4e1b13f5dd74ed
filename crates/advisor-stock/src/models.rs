//! Stock data carried through the pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// A news link as reported by the market-data provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsReference {
    pub title: String,
    pub link: String,
}

/// One trading day of price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// News and price history for one stock, as fetched on a cache miss
///
/// Bundles are immutable once built and shared behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockBundle {
    /// Rendered news entries, provider order (most recent first)
    pub news: Vec<String>,
    /// Daily rows in chronological order
    pub financials: Vec<FinancialRow>,
}

impl StockBundle {
    pub fn new(news: Vec<String>, financials: Vec<FinancialRow>) -> Self {
        Self { news, financials }
    }

    /// Render at most `news_entries` news items and `financial_entries` rows
    ///
    /// ```text
    /// Financials:
    /// <table>
    /// News:
    /// [0] - <entry>
    /// ```
    pub fn describe(&self, news_entries: usize, financial_entries: usize) -> String {
        let rows = &self.financials[..financial_entries.min(self.financials.len())];

        let mut description = format!("Financials:\n{}\nNews:\n", render_financials(rows));
        for (index, entry) in self.news.iter().take(news_entries).enumerate() {
            let _ = writeln!(description, "[{index}] - {entry}");
        }
        description
    }
}

/// Format a news article the way it is stored in a bundle
pub fn format_news_entry(title: &str, body: &str) -> String {
    format!("{title}\n\"{body}\"")
}

const COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Render rows as a right-aligned text table; empty input renders as ""
pub fn render_financials(rows: &[FinancialRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", row.open),
                format!("{:.2}", row.high),
                format!("{:.2}", row.low),
                format!("{:.2}", row.close),
                row.volume.to_string(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.len());
        }
    }

    let header = COLUMNS.map(ToString::to_string);
    std::iter::once(&header)
        .chain(cells.iter())
        .map(|line| {
            line.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:>width$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
