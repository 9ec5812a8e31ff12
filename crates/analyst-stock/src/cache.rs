//! Caching layer for market data to reduce API calls
//!
//! A batch of tickers shares the benchmark series and often a sector ETF,
//! so each is fetched once per TTL instead of once per ticker.

use cached::{Cached, TimedCache};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::LookbackPeriod;

/// Cache key for market-data requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// Operation type
    pub endpoint: &'static str,
    /// History window, for series requests
    pub period: Option<LookbackPeriod>,
}

impl CacheKey {
    pub fn series(symbol: impl Into<String>, period: LookbackPeriod) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: "series",
            period: Some(period),
        }
    }

    pub fn profile(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: "profile",
            period: None,
        }
    }
}

/// Thread-safe TTL cache for provider responses
pub struct ResponseCache<V> {
    cache: Arc<RwLock<TimedCache<CacheKey, V>>>,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Errors from the fetcher are returned and nothing is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_keys_distinguish_endpoint_and_period() {
        assert_ne!(CacheKey::series("XLK", LookbackPeriod::OneYear), CacheKey::profile("XLK"));
        assert_ne!(
            CacheKey::series("XLK", LookbackPeriod::OneYear),
            CacheKey::series("XLK", LookbackPeriod::TwoYears)
        );
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::profile("AAPL");

        cache.insert(key.clone(), 150.0_f64).await;

        assert_eq!(cache.get(&key).await, Some(150.0));
        assert_eq!(cache.get(&CacheKey::profile("MSFT")).await, None);
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::series("^GSPC", LookbackPeriod::OneYear);

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(vec![1.0, 2.0]) }
            })
            .await
            .unwrap();
        assert_eq!(result, vec![1.0, 2.0]);
        assert_eq!(call_count, 1);

        // Second call should use cache
        let result = cache
            .get_or_fetch(key, || {
                call_count += 1;
                async { Ok::<_, String>(vec![9.0]) }
            })
            .await
            .unwrap();
        assert_eq!(result, vec![1.0, 2.0]);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: ResponseCache<u32> = ResponseCache::new(Duration::from_secs(60));
        let key = CacheKey::profile("FAIL");

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<u32, _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty().await);

        cache.insert(key, 1).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}
