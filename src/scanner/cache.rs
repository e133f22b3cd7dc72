//! TTL snapshot cache for scan results
//!
//! Keys are structured tuples, values are read-only `Arc` snapshots replaced
//! wholesale on insert. Expiry is enforced on read, so a stale entry can
//! never be observed even if it has not been purged yet.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::types::CacheStats;

/// Cache key: token symbol plus the sorted set of networks scanned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanKey {
    pub token: String,
    pub networks: Vec<String>,
}

impl ScanKey {
    pub fn new(token: impl Into<String>, mut networks: Vec<String>) -> Self {
        networks.sort();
        networks.dedup();
        Self {
            token: token.into(),
            networks,
        }
    }
}

struct Entry<V> {
    inserted_at: Instant,
    value: Arc<V>,
}

pub struct SnapshotCache<V> {
    entries: RwLock<HashMap<ScanKey, Entry<V>>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> SnapshotCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &ScanKey) -> Option<Arc<V>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&entry.value))
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert-or-replace; the previous snapshot (if any) stays valid for
    /// readers already holding its Arc.
    pub async fn insert(&self, key: ScanKey, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                inserted_at: Instant::now(),
                value: Arc::new(value),
            },
        );
    }

    /// Drop entries past their TTL. Correctness never depends on this being
    /// called; it only bounds memory.
    pub async fn purge_expired(&self) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.inserted_at.elapsed() <= self.ttl);
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().await.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    #[allow(dead_code)]
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_key_normalizes_network_order() {
        let a = ScanKey::new("WETH", vec!["polygon".to_string(), "ethereum".to_string()]);
        let b = ScanKey::new("WETH", vec!["ethereum".to_string(), "polygon".to_string()]);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        let key = ScanKey::new("WETH", vec!["ethereum".to_string()]);
        cache.insert(key.clone(), 42u64).await;

        assert_eq!(cache.get(&key).await.as_deref(), Some(&42));
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_expiry_on_read() {
        let cache = SnapshotCache::new(Duration::from_millis(20));
        let key = ScanKey::new("WETH", vec!["ethereum".to_string()]);
        cache.insert(key.clone(), 42u64).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&key).await.is_none());
        assert_eq!(cache.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_insert_replaces_wholesale() {
        let cache = SnapshotCache::new(Duration::from_secs(10));
        let key = ScanKey::new("WETH", vec!["ethereum".to_string()]);
        cache.insert(key.clone(), 1u64).await;

        let old = cache.get(&key).await.unwrap();
        cache.insert(key.clone(), 2u64).await;

        // the old snapshot is untouched, the new read sees the replacement
        assert_eq!(*old, 1);
        assert_eq!(cache.get(&key).await.as_deref(), Some(&2));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = SnapshotCache::new(Duration::from_millis(10));
        cache
            .insert(ScanKey::new("WETH", vec!["ethereum".to_string()]), 1u64)
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        cache.purge_expired().await;
        assert_eq!(cache.stats().await.entries, 0);
    }
}
