//! Yahoo Finance market data

use super::{MarketDataProvider, TickerListing};
use crate::error::{Result, StockError};
use crate::models::{FinancialRow, NewsReference};
use async_trait::async_trait;
use chrono::DateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Daily bars over the trailing month
const HISTORY_INTERVAL: &str = "1d";
const HISTORY_RANGE: &str = "1mo";

/// Yahoo Finance backed [`MarketDataProvider`]
pub struct YahooMarketData {
    connector: yahoo::YahooConnector,
}

impl YahooMarketData {
    /// Create a new Yahoo Finance client
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    #[instrument(skip(self))]
    async fn lookup(&self, symbol: &str) -> Result<TickerListing> {
        let result = self
            .connector
            .search_ticker(symbol)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let listed = result
            .quotes
            .iter()
            .any(|quote| quote.symbol.eq_ignore_ascii_case(symbol));
        debug!(listed, "Resolved ticker");

        Ok(if listed {
            TickerListing::listed(symbol)
        } else {
            TickerListing::unlisted(symbol)
        })
    }

    #[instrument(skip(self), fields(symbol = %listing.symbol))]
    async fn news(&self, listing: &TickerListing) -> Result<Vec<NewsReference>> {
        if !listing.listed {
            return Ok(Vec::new());
        }

        let result = self
            .connector
            .search_ticker(&listing.symbol)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        Ok(result
            .news
            .into_iter()
            .map(|item| NewsReference {
                title: item.title,
                link: item.link,
            })
            .collect())
    }

    #[instrument(skip(self), fields(symbol = %listing.symbol))]
    async fn history(&self, listing: &TickerListing) -> Result<Vec<FinancialRow>> {
        if !listing.listed {
            return Ok(Vec::new());
        }

        let response = self
            .connector
            .get_quote_range(&listing.symbol, HISTORY_INTERVAL, HISTORY_RANGE)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        Ok(quotes_or_empty(response.quotes())?
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(FinancialRow {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect())
    }
}

/// A listed symbol with no bars in range is empty history, not a failure
fn quotes_or_empty(
    result: std::result::Result<Vec<yahoo::Quote>, yahoo::YahooError>,
) -> Result<Vec<yahoo::Quote>> {
    match result {
        Ok(quotes) => Ok(quotes),
        Err(yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) => Ok(Vec::new()),
        Err(e) => Err(StockError::YahooFinanceError(e.to_string())),
    }
}
