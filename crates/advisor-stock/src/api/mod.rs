//! External collaborators: market data and article pages
//!
//! The pipeline only talks to these traits; the Yahoo Finance and HTTP
//! implementations are the production wiring, tests substitute mocks.

pub mod pages;
pub mod yahoo;

use crate::error::Result;
use crate::models::{FinancialRow, NewsReference};
use async_trait::async_trait;

pub use pages::HttpPageFetcher;
pub use yahoo::YahooMarketData;

/// Result of a provider lookup for one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerListing {
    /// Symbol as requested
    pub symbol: String,
    /// False when the provider does not know the symbol; such listings
    /// yield empty news and history instead of errors
    pub listed: bool,
}

impl TickerListing {
    pub fn listed(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            listed: true,
        }
    }

    pub fn unlisted(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            listed: false,
        }
    }
}

/// Source of news references and daily price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Look a symbol up; called once per memoized ticker handle
    async fn lookup(&self, symbol: &str) -> Result<TickerListing>;

    /// Recent news references, most recent first
    async fn news(&self, listing: &TickerListing) -> Result<Vec<NewsReference>>;

    /// Daily rows for the trailing month, chronological
    async fn history(&self, listing: &TickerListing) -> Result<Vec<FinancialRow>>;
}

/// Fetches a web page and extracts its paragraph text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Paragraph text of `url`, joined by newlines in document order
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
