//! In-memory decision cache using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;

use crate::domain::access::{DecisionCache, DecisionKey};

/// Default number of distinct keys kept before eviction
pub const DEFAULT_MAX_CAPACITY: u64 = 1024;

/// Configuration for the in-memory decision cache
#[derive(Debug, Clone)]
pub struct InMemoryDecisionCacheConfig {
    /// Maximum number of cached decisions
    pub max_capacity: u64,
}

impl Default for InMemoryDecisionCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl InMemoryDecisionCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Bounded decision cache with least-recently-used eviction.
///
/// Entries never expire on their own; they leave only through eviction or
/// [`DecisionCache::clear`].
#[derive(Debug, Clone)]
pub struct InMemoryDecisionCache {
    cache: MokaCache<DecisionKey, bool>,
}

impl InMemoryDecisionCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryDecisionCacheConfig::default())
    }

    pub fn with_config(config: InMemoryDecisionCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { cache }
    }
}

impl Default for InMemoryDecisionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionCache for InMemoryDecisionCache {
    async fn get(&self, key: &DecisionKey) -> Option<bool> {
        self.cache.get(key).await
    }

    async fn put(&self, key: DecisionKey, allowed: bool) {
        self.cache.insert(key, allowed).await;
    }

    async fn remove(&self, key: &DecisionKey) {
        self.cache.invalidate(key).await;
    }

    async fn clear(&self) {
        // invalidate_all hides every existing entry from `get` as soon as it
        // returns; pending tasks only reclaim the memory.
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    async fn size(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(address: &str) -> DecisionKey {
        DecisionKey::new(address, "", "US")
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = InMemoryDecisionCache::new();

        cache.put(key("10.0.0.1"), true).await;
        cache.put(key("10.0.0.2"), false).await;

        assert_eq!(cache.get(&key("10.0.0.1")).await, Some(true));
        assert_eq!(cache.get(&key("10.0.0.2")).await, Some(false));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryDecisionCache::new();

        assert_eq!(cache.get(&key("10.0.0.1")).await, None);
    }

    #[tokio::test]
    async fn test_specs_are_not_normalized() {
        let cache = InMemoryDecisionCache::new();

        cache
            .put(DecisionKey::new("10.0.0.1", "10.0.0.1,10.0.0.2", ""), true)
            .await;

        let reordered = DecisionKey::new("10.0.0.1", "10.0.0.2,10.0.0.1", "");
        assert_eq!(cache.get(&reordered).await, None);
    }

    #[tokio::test]
    async fn test_remove_only_drops_that_key() {
        let cache = InMemoryDecisionCache::new();

        cache.put(key("10.0.0.1"), true).await;
        cache.put(key("10.0.0.2"), true).await;

        cache.remove(&key("10.0.0.1")).await;

        assert_eq!(cache.get(&key("10.0.0.1")).await, None);
        assert_eq!(cache.get(&key("10.0.0.2")).await, Some(true));
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryDecisionCache::new();

        cache.put(key("10.0.0.1"), true).await;
        cache.put(key("10.0.0.2"), true).await;

        cache.clear().await;

        assert_eq!(cache.get(&key("10.0.0.1")).await, None);
        assert_eq!(cache.get(&key("10.0.0.2")).await, None);
        assert_eq!(cache.size().await, 0);
    }

    #[tokio::test]
    async fn test_put_after_clear_is_visible() {
        let cache = InMemoryDecisionCache::new();

        cache.put(key("10.0.0.1"), true).await;
        cache.clear().await;
        cache.put(key("10.0.0.1"), false).await;

        assert_eq!(cache.get(&key("10.0.0.1")).await, Some(false));
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let config = InMemoryDecisionCacheConfig::default().with_max_capacity(4);
        let cache = InMemoryDecisionCache::with_config(config);

        for i in 0..20 {
            cache.put(key(&format!("10.0.0.{}", i)), true).await;
        }

        assert!(cache.size().await <= 4);
        assert_eq!(cache.get(&key("10.0.0.19")).await, Some(true));
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(
            InMemoryDecisionCacheConfig::default().max_capacity,
            DEFAULT_MAX_CAPACITY
        );
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let cache = std::sync::Arc::new(InMemoryDecisionCache::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for j in 0..50 {
                    let k = key(&format!("10.{}.0.{}", i, j));
                    cache.put(k.clone(), j % 2 == 0).await;
                    assert_eq!(cache.get(&k).await, Some(j % 2 == 0));
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.size().await, 400);
    }
}
