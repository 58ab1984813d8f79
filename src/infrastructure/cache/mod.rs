pub mod cache_keys;
pub mod in_memory;

use async_trait::async_trait;

use crate::core::errors::SplitlyError;
use crate::core::services::GroupBalancesResponse;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_group_balances(
        &self,
        group_id: &str,
    ) -> Result<Option<GroupBalancesResponse>, SplitlyError>;
    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &GroupBalancesResponse,
        ttl: std::time::Duration,
    ) -> Result<(), SplitlyError>;
    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), SplitlyError>;
}
