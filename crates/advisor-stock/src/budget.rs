//! Per-stock content budgets and briefing text

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::models::StockBundle;
use serde::Serialize;

/// Every stock contributes at least this many news items
pub const MIN_NEWS_PER_STOCK: usize = 1;
/// Every stock contributes at least this many financial rows
pub const MIN_FINANCIAL_ROWS_PER_STOCK: usize = 3;

/// How much one stock may contribute to the briefing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Budget {
    pub news_per_stock: usize,
    pub financial_rows_per_stock: usize,
}

/// Splits the global news/row budget across the requested stocks
///
/// The per-stock floors win over the global maximum, so a request for many
/// stocks can exceed `max_news_entries` / `max_financial_entries` in total.
#[derive(Debug, Clone, Copy)]
pub struct DescriptionBudgeter {
    max_news_entries: usize,
    max_financial_entries: usize,
}

impl DescriptionBudgeter {
    pub fn new(max_news_entries: usize, max_financial_entries: usize) -> Self {
        Self {
            max_news_entries,
            max_financial_entries,
        }
    }

    pub fn from_config(config: &StockConfig) -> Self {
        Self::new(config.max_news_entries, config.max_financial_entries)
    }

    /// Per-stock budget for `stock_count` requested stocks
    pub fn budget(&self, stock_count: usize) -> Result<Budget> {
        if stock_count == 0 {
            return Err(StockError::InvalidInput(
                "at least one stock must be requested".to_string(),
            ));
        }

        Ok(Budget {
            news_per_stock: (self.max_news_entries / stock_count).max(MIN_NEWS_PER_STOCK),
            financial_rows_per_stock: (self.max_financial_entries / stock_count)
                .max(MIN_FINANCIAL_ROWS_PER_STOCK),
        })
    }

    /// One stock's block: symbol line, then the bounded description
    pub fn render_block(&self, symbol: &str, bundle: &StockBundle, budget: Budget) -> String {
        format!(
            "{symbol}\n{}\n",
            bundle.describe(budget.news_per_stock, budget.financial_rows_per_stock)
        )
    }

    /// Concatenated blocks for every stock, in the given order
    pub fn describe<S, B>(&self, stocks: &[(S, B)]) -> Result<String>
    where
        S: AsRef<str>,
        B: AsRef<StockBundle>,
    {
        let budget = self.budget(stocks.len())?;
        Ok(stocks
            .iter()
            .map(|(symbol, bundle)| self.render_block(symbol.as_ref(), bundle.as_ref(), budget))
            .collect())
    }
}

impl AsRef<StockBundle> for StockBundle {
    fn as_ref(&self) -> &StockBundle {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FinancialRow;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn bundle(news: usize, rows: usize) -> StockBundle {
        StockBundle::new(
            (0..news).map(|i| format!("story {i}")).collect(),
            (0..rows)
                .map(|i| FinancialRow {
                    date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    open: 1.0,
                    high: 2.0,
                    low: 0.5,
                    close: 1.5,
                    volume: 100,
                })
                .collect(),
        )
    }

    #[test]
    fn test_single_stock_gets_whole_budget() {
        let budget = DescriptionBudgeter::new(10, 20).budget(1).unwrap();
        assert_eq!(budget.news_per_stock, 10);
        assert_eq!(budget.financial_rows_per_stock, 20);
    }

    #[test]
    fn test_budget_matches_floor_division_with_floors() {
        let budgeter = DescriptionBudgeter::new(10, 20);
        for n in 1..=40 {
            let budget = budgeter.budget(n).unwrap();
            assert_eq!(budget.news_per_stock, (10 / n).max(1), "news for {n}");
            assert_eq!(budget.financial_rows_per_stock, (20 / n).max(3), "rows for {n}");
        }
    }

    #[test]
    fn test_floors_exceed_global_cap() {
        let budget = DescriptionBudgeter::new(2, 4).budget(5).unwrap();
        assert_eq!(budget.news_per_stock, 1);
        assert_eq!(budget.financial_rows_per_stock, 3);
    }

    #[test]
    fn test_zero_stocks_is_invalid_input() {
        let result = DescriptionBudgeter::new(10, 20).budget(0);
        assert!(matches!(result, Err(StockError::InvalidInput(_))));

        let empty: [(&str, StockBundle); 0] = [];
        assert!(DescriptionBudgeter::new(10, 20).describe(&empty).is_err());
    }

    #[test]
    fn test_render_block_layout() {
        let budgeter = DescriptionBudgeter::new(10, 20);
        let block = budgeter.render_block("AAPL", &bundle(1, 0), budgeter.budget(1).unwrap());
        assert_eq!(block, "AAPL\nFinancials:\n\nNews:\n[0] - story 0\n\n");
    }

    #[test]
    fn test_describe_applies_budget_in_request_order() {
        let budgeter = DescriptionBudgeter::new(4, 6);
        let stocks = vec![
            ("MSFT", Arc::new(bundle(5, 10))),
            ("AAPL", Arc::new(bundle(5, 10))),
        ];

        let text = budgeter.describe(&stocks).unwrap();

        let msft = text.find("MSFT\n").unwrap();
        let aapl = text.find("AAPL\n").unwrap();
        assert!(msft < aapl);

        // 4 / 2 = 2 news items and max(3, 6 / 2) = 3 rows per stock
        assert_eq!(text.matches("[1] - story 1").count(), 2);
        assert_eq!(text.matches("[2] - ").count(), 0);
        assert_eq!(text.matches("2024-04-03").count(), 2);
        assert_eq!(text.matches("2024-04-04").count(), 0);
    }
}
