use crate::blockchain::contracts::ContentData;
use chrono::{DateTime, Duration, Utc};
use ethers::types::Address;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CachedList {
    contents: Vec<ContentData>,
    cached_at: DateTime<Utc>,
}

impl CachedList {
    fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() > self.cached_at + ttl
    }
}

/// Short-lived cache for the on-chain content list. Entries are keyed by
/// contract address and only ever a few seconds stale; the chain stays
/// authoritative.
#[derive(Clone)]
pub struct ContentCache {
    cache: Arc<RwLock<LruCache<Address, CachedList>>>,
    ttl: Duration,
}

impl ContentCache {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            cache: Arc::new(RwLock::new(LruCache::new(capacity))),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    pub async fn get(&self, contract: &Address) -> Option<Vec<ContentData>> {
        let mut cache = self.cache.write().await;

        if let Some(item) = cache.get(contract) {
            if item.is_expired(self.ttl) {
                cache.pop(contract);
                None
            } else {
                Some(item.contents.clone())
            }
        } else {
            None
        }
    }

    pub async fn put(&self, contract: Address, contents: Vec<ContentData>) {
        let mut cache = self.cache.write().await;
        cache.put(
            contract,
            CachedList {
                contents,
                cached_at: Utc::now(),
            },
        );
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U256;

    fn sample_contents() -> Vec<ContentData> {
        vec![ContentData {
            id: 1,
            uri: "ipfs://QmTest123".to_string(),
            price: U256::from(100),
            votes: 2,
            active: true,
        }]
    }

    #[tokio::test]
    async fn test_cache_operations() {
        let cache = ContentCache::new(4, 60);
        let contract = Address::repeat_byte(0x01);

        assert!(cache.get(&contract).await.is_none());

        cache.put(contract, sample_contents()).await;
        let cached = cache.get(&contract).await.unwrap();
        assert_eq!(cached, sample_contents());
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.get(&contract).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ContentCache::new(4, 0);
        let contract = Address::repeat_byte(0x02);

        cache.put(contract, sample_contents()).await;

        // TTL of zero expires on the next read
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(cache.get(&contract).await.is_none());
    }
}
