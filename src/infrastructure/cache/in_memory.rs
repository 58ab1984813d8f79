use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::errors::SplitlyError;
use crate::core::services::GroupBalancesResponse;
use crate::infrastructure::cache::{Cache, cache_keys};

#[derive(Clone)]
pub struct InMemoryCache {
    cache: Arc<RwLock<HashMap<String, (GroupBalancesResponse, DateTime<Utc>)>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_group_balances(
        &self,
        group_id: &str,
    ) -> Result<Option<GroupBalancesResponse>, SplitlyError> {
        let key = cache_keys::group_balances_key(group_id);
        let cache = self.cache.read().await;
        match cache.get(&key) {
            Some((balances, expiry)) if *expiry > Utc::now() => Ok(Some(balances.clone())),
            _ => Ok(None),
        }
    }

    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &GroupBalancesResponse,
        ttl: std::time::Duration,
    ) -> Result<(), SplitlyError> {
        let key = cache_keys::group_balances_key(group_id);
        let expiry = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| SplitlyError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        self.cache
            .write()
            .await
            .insert(key, (balances.clone(), expiry));
        Ok(())
    }

    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), SplitlyError> {
        let key = cache_keys::group_balances_key(group_id);
        self.cache.write().await.remove(&key);
        Ok(())
    }
}
