//! Cached access to stock bundles

use crate::api::{HttpPageFetcher, MarketDataProvider, PageFetcher, YahooMarketData};
use crate::cache::StockCache;
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::models::StockBundle;
use crate::ticker::TickerResolver;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Returns cached stock bundles, fetching and caching them on a miss
///
/// Build one manager at process start and share it (`Arc<StocksManager>`)
/// with every request; the cache is only useful if it outlives requests.
/// Concurrent callers asking for the same symbol are serialized so that a
/// miss triggers a single fetch.
pub struct StocksManager {
    cache: StockCache,
    resolver: TickerResolver,
    fetch_locks: FetchLocks,
}

type FetchLocks = SyncMutex<HashMap<String, Arc<Mutex<()>>>>;

/// A caller's claim on one symbol's fetch lock
///
/// Dropping it (including when the owning future is cancelled) removes the
/// map entry once no other caller holds or waits on the lock.
struct SymbolLock<'a> {
    locks: &'a FetchLocks,
    symbol: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> SymbolLock<'a> {
    fn acquire(locks: &'a FetchLocks, symbol: &'a str) -> Self {
        let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = Arc::clone(map.entry(symbol.to_string()).or_default());
        Self {
            locks,
            symbol,
            lock,
        }
    }
}

impl Drop for SymbolLock<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // only the map and this claim remain
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(self.symbol);
        }
    }
}

impl StocksManager {
    /// Create a manager over the given collaborators
    pub fn new(
        config: &StockConfig,
        provider: Arc<dyn MarketDataProvider>,
        pages: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            cache: StockCache::new(config.cache_capacity, config.cache_ttl),
            resolver: TickerResolver::new(
                provider,
                pages,
                config.cache_capacity,
                config.cache_ttl,
            ),
            fetch_locks: SyncMutex::new(HashMap::new()),
        }
    }

    /// Create a manager backed by Yahoo Finance and plain HTTP page fetches
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        config.validate()?;
        let provider = Arc::new(YahooMarketData::new()?);
        let pages = Arc::new(HttpPageFetcher::new(
            config.request_timeout,
            config.page_cache_capacity,
        )?);
        Ok(Self::new(config, provider, pages))
    }

    /// News and price history for `symbol`
    ///
    /// A cache hit is returned as is and does not extend the entry's lifetime.
    /// Any collaborator failure surfaces as [`StockError::FetchFailed`] and
    /// leaves the cache untouched.
    #[instrument(skip(self))]
    pub async fn get_info(&self, symbol: &str) -> Result<Arc<StockBundle>> {
        if let Some(bundle) = self.cache.get(symbol).await {
            debug!("Cache hit");
            return Ok(bundle);
        }

        let claim = SymbolLock::acquire(&self.fetch_locks, symbol);
        let _guard = claim.lock.lock().await;

        // another caller may have filled it while we waited
        if let Some(bundle) = self.cache.get(symbol).await {
            return Ok(bundle);
        }

        debug!("Cache miss");
        let fetched = self.fetch(symbol).await.map(Arc::new);
        if let Ok(bundle) = &fetched {
            self.cache.put(symbol, Arc::clone(bundle)).await;
        }
        fetched
    }

    async fn fetch(&self, symbol: &str) -> Result<StockBundle> {
        let handle = self
            .resolver
            .resolve(symbol)
            .await
            .map_err(|e| StockError::fetch_failed(symbol, e))?;

        let news = handle
            .fetch_news()
            .await
            .map_err(|e| StockError::fetch_failed(symbol, e))?;
        let financials = handle
            .fetch_financials()
            .await
            .map_err(|e| StockError::fetch_failed(symbol, e))?;

        info!(
            news = news.len(),
            rows = financials.len(),
            listed = handle.listing().listed,
            "Fetched stock data"
        );
        Ok(StockBundle::new(news, financials))
    }

    /// The underlying bundle cache
    pub fn cache(&self) -> &StockCache {
        &self.cache
    }

    /// Drop every cached bundle and memoized lookup
    pub async fn shutdown(&self) {
        self.cache.clear().await;
        self.resolver.clear().await;
        self.fetch_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        info!("Stocks manager caches cleared");
    }
}
