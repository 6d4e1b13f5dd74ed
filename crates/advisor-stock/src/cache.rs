//! Capacity- and time-bounded cache of stock bundles
//!
//! Entries expire `ttl` after insertion and are never returned afterwards.
//! When a new symbol would push the number of live entries past the capacity,
//! the entry inserted earliest is evicted first (FIFO by insertion, reads do
//! not refresh anything).

use crate::models::StockBundle;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheEntry {
    bundle: Arc<StockBundle>,
    inserted_at: Instant,
    seq: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// insertion sequence -> symbol, oldest first
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl CacheState {
    fn remove(&mut self, symbol: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(symbol)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    /// Drop every entry older than `ttl`; returns how many were dropped
    fn purge_expired(&mut self, now: Instant, ttl: Duration) -> usize {
        let mut purged = 0;
        // insertion order == age order, so stop at the first live entry
        while let Some((_, symbol)) = self.order.first_key_value() {
            let expired = self
                .entries
                .get(symbol)
                .is_none_or(|entry| now.duration_since(entry.inserted_at) > ttl);
            if !expired {
                break;
            }
            if let Some((_, symbol)) = self.order.pop_first() {
                self.entries.remove(&symbol);
                purged += 1;
            }
        }
        purged
    }
}

/// Thread-safe cache for stock bundles
pub struct StockCache {
    state: Arc<RwLock<CacheState>>,
    capacity: usize,
    ttl: Duration,
}

impl StockCache {
    /// Create a new cache holding at most `capacity` entries for `ttl` each
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Get a live bundle; expired entries are purged and reported absent
    pub async fn get(&self, symbol: &str) -> Option<Arc<StockBundle>> {
        let now = Instant::now();
        {
            let state = self.state.read().await;
            match state.entries.get(symbol) {
                None => return None,
                Some(entry) if now.duration_since(entry.inserted_at) <= self.ttl => {
                    return Some(Arc::clone(&entry.bundle));
                }
                Some(_) => {}
            }
        }

        let mut state = self.state.write().await;
        let expired = state
            .entries
            .get(symbol)
            .is_some_and(|entry| now.duration_since(entry.inserted_at) > self.ttl);
        if expired {
            state.remove(symbol);
            tracing::debug!(symbol, "Cache entry expired");
        }
        None
    }

    /// Insert or replace the bundle for `symbol`, timestamped now
    pub async fn put(&self, symbol: impl Into<String>, bundle: Arc<StockBundle>) {
        let symbol = symbol.into();
        let now = Instant::now();
        let mut state = self.state.write().await;

        state.purge_expired(now, self.ttl);
        state.remove(&symbol);

        while state.entries.len() >= self.capacity {
            match state.order.pop_first() {
                Some((_, evicted)) => {
                    state.entries.remove(&evicted);
                    tracing::debug!(symbol = %evicted, "Evicted oldest cache entry");
                }
                None => break,
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.order.insert(seq, symbol.clone());
        state.entries.insert(
            symbol,
            CacheEntry {
                bundle,
                inserted_at: now,
                seq,
            },
        );
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let state = self.state.read().await;
        state
            .entries
            .values()
            .filter(|entry| now.duration_since(entry.inserted_at) <= self.ttl)
            .count()
    }

    /// Check if the cache holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.order.clear();
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Clone for StockCache {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            capacity: self.capacity,
            ttl: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    fn bundle(tag: &str) -> Arc<StockBundle> {
        Arc::new(StockBundle::new(vec![tag.to_string()], Vec::new()))
    }

    #[tokio::test]
    async fn test_read_your_write() {
        let cache = StockCache::new(128, TTL);
        let value = bundle("aapl");

        cache.put("AAPL", Arc::clone(&value)).await;

        let retrieved = cache.get("AAPL").await;
        assert_eq!(retrieved, Some(value));
        assert!(cache.get("MSFT").await.is_none());
    }

    #[tokio::test]
    async fn test_keys_are_case_sensitive() {
        let cache = StockCache::new(128, TTL);
        cache.put("AAPL", bundle("upper")).await;
        assert!(cache.get("aapl").await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let cache = StockCache::new(128, TTL);
        cache.put("AAPL", bundle("old")).await;
        cache.put("AAPL", bundle("new")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("AAPL").await.unwrap().news, vec!["new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = StockCache::new(128, TTL);
        cache.put("AAPL", bundle("aapl")).await;

        tokio::time::advance(TTL).await;
        assert!(cache.get("AAPL").await.is_some(), "alive at exactly ttl");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("AAPL").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_does_not_extend_lifetime() {
        let cache = StockCache::new(128, TTL);
        cache.put("AAPL", bundle("aapl")).await;

        tokio::time::advance(Duration::from_secs(200)).await;
        assert!(cache.get("AAPL").await.is_some());

        tokio::time::advance(Duration::from_secs(101)).await;
        assert!(cache.get("AAPL").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_refreshes_insertion_time() {
        let cache = StockCache::new(128, TTL);
        cache.put("AAPL", bundle("first")).await;

        tokio::time::advance(Duration::from_secs(200)).await;
        cache.put("AAPL", bundle("second")).await;

        tokio::time::advance(Duration::from_secs(200)).await;
        assert_eq!(cache.get("AAPL").await.unwrap().news, vec!["second"]);
    }

    #[tokio::test]
    async fn test_capacity_evicts_earliest_inserted() {
        let cache = StockCache::new(128, TTL);
        for i in 0..128 {
            cache.put(format!("SYM{i}"), bundle("x")).await;
        }
        assert_eq!(cache.len().await, 128);

        // reading the oldest must not protect it
        assert!(cache.get("SYM0").await.is_some());

        cache.put("SYM128", bundle("x")).await;

        assert_eq!(cache.len().await, 128);
        assert!(cache.get("SYM0").await.is_none());
        for i in 1..=128 {
            assert!(cache.get(&format!("SYM{i}")).await.is_some(), "SYM{i} missing");
        }
    }

    #[tokio::test]
    async fn test_overwrite_moves_entry_to_back_of_eviction_order() {
        let cache = StockCache::new(2, TTL);
        cache.put("A", bundle("a")).await;
        cache.put("B", bundle("b")).await;
        cache.put("A", bundle("a2")).await;
        cache.put("C", bundle("c")).await;

        assert!(cache.get("B").await.is_none());
        assert!(cache.get("A").await.is_some());
        assert!(cache.get("C").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_do_not_count_against_capacity() {
        let cache = StockCache::new(2, TTL);
        cache.put("A", bundle("a")).await;
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.put("B", bundle("b")).await;
        tokio::time::advance(Duration::from_secs(150)).await;

        // A is expired, so inserting C must keep B
        cache.put("C", bundle("c")).await;
        assert!(cache.get("B").await.is_some());
        assert!(cache.get("C").await.is_some());
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = StockCache::new(128, TTL);
        for i in 0..5 {
            cache.put(format!("STOCK{i}"), bundle("x")).await;
        }
        assert_eq!(cache.len().await, 5);

        let shared = cache.clone();
        shared.clear().await;
        assert!(cache.is_empty().await);
    }
}
