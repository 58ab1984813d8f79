use async_trait::async_trait;

use crate::core::errors::SplitlyError;
use crate::core::models::{audit::GroupAudit, group::Group, transaction::Transaction, user::User};

#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User, SplitlyError>;
    async fn save_user(&self, user: User) -> Result<(), SplitlyError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitlyError>;

    async fn save_group(&self, group: Group) -> Result<(), SplitlyError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitlyError>;
    async fn delete_group(&self, group_id: &str) -> Result<(), SplitlyError>;
    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitlyError>;

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), SplitlyError>;
    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, SplitlyError>;
    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), SplitlyError>;
    async fn get_group_transactions(&self, group_id: &str)
    -> Result<Vec<Transaction>, SplitlyError>;

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitlyError>;
    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitlyError>;
}

pub mod in_memory;
