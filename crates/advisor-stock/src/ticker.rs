//! Ticker resolution and per-ticker fetching

use crate::api::{MarketDataProvider, PageFetcher, TickerListing};
use crate::error::Result;
use crate::models::{FinancialRow, NewsReference, format_news_entry};
use cached::{Cached, TimedSizedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Upper bound on news references taken from the provider per ticker
pub const MAX_NEWS_REFERENCES: usize = 5;

/// A resolved symbol exposing its fetch operations
#[derive(Clone)]
pub struct TickerHandle {
    listing: TickerListing,
    provider: Arc<dyn MarketDataProvider>,
    pages: Arc<dyn PageFetcher>,
}

impl TickerHandle {
    pub fn symbol(&self) -> &str {
        &self.listing.symbol
    }

    pub fn listing(&self) -> &TickerListing {
        &self.listing
    }

    /// At most [`MAX_NEWS_REFERENCES`] references, provider order
    pub async fn news_references(&self) -> Result<Vec<NewsReference>> {
        let mut references = self.provider.news(&self.listing).await?;
        references.truncate(MAX_NEWS_REFERENCES);
        Ok(references)
    }

    /// News entries rendered as `title\n"body"`, one page fetch per reference
    ///
    /// References are fetched one after another; the first failure aborts.
    pub async fn fetch_news(&self) -> Result<Vec<String>> {
        let references = self.news_references().await?;
        let mut news = Vec::with_capacity(references.len());
        for reference in references {
            let body = self.pages.fetch_text(&reference.link).await?;
            news.push(format_news_entry(&reference.title, &body));
        }
        Ok(news)
    }

    /// Trailing-month daily rows, chronological
    pub async fn fetch_financials(&self) -> Result<Vec<FinancialRow>> {
        self.provider.history(&self.listing).await
    }
}

/// Memoizing symbol → [`TickerHandle`] resolver
///
/// The memo is bounded by capacity and lifetime, same as the stock cache.
pub struct TickerResolver {
    provider: Arc<dyn MarketDataProvider>,
    pages: Arc<dyn PageFetcher>,
    memo: Mutex<TimedSizedCache<String, TickerListing>>,
}

impl TickerResolver {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        pages: Arc<dyn PageFetcher>,
        capacity: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            pages,
            memo: Mutex::new(TimedSizedCache::with_size_and_lifespan(capacity.max(1), ttl)),
        }
    }

    /// Resolve `symbol`, looking it up at most once per memo lifetime
    pub async fn resolve(&self, symbol: &str) -> Result<TickerHandle> {
        let key = symbol.to_string();
        let memoized = self.memo.lock().await.cache_get(&key).cloned();

        let listing = match memoized {
            Some(listing) => listing,
            None => {
                debug!(symbol, "Looking up ticker");
                let listing = self.provider.lookup(symbol).await?;
                self.memo.lock().await.cache_set(key, listing.clone());
                listing
            }
        };

        Ok(TickerHandle {
            listing,
            provider: Arc::clone(&self.provider),
            pages: Arc::clone(&self.pages),
        })
    }

    /// Forget every memoized lookup
    pub async fn clear(&self) {
        self.memo.lock().await.cache_clear();
    }
}
