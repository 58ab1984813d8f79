use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::errors::SplitlyError;
use crate::core::models::{audit::GroupAudit, group::Group, transaction::Transaction, user::User};
use crate::infrastructure::storage::Storage;

pub struct InMemoryStorage {
    users: Mutex<HashMap<String, User>>,
    emails: Mutex<HashMap<String, String>>, // email -> user_id
    groups: Mutex<HashMap<String, Group>>,
    transactions: Mutex<HashMap<String, Transaction>>,
    group_audits: Mutex<HashMap<String, Vec<GroupAudit>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Mutex::new(HashMap::new()),
            emails: Mutex::new(HashMap::new()),
            groups: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            group_audits: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: User) -> Result<User, SplitlyError> {
        let mut emails = self.emails.lock().await;
        if emails.contains_key(&user.email) {
            return Err(SplitlyError::EmailAlreadyRegistered(user.email));
        }
        emails.insert(user.email.clone(), user.id.clone());
        let mut users = self.users.lock().await;
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: User) -> Result<(), SplitlyError> {
        self.users.lock().await.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitlyError> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn save_group(&self, group: Group) -> Result<(), SplitlyError> {
        self.groups.lock().await.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitlyError> {
        Ok(self.groups.lock().await.get(group_id).cloned())
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), SplitlyError> {
        // For production: wrap in a database transaction
        self.groups.lock().await.remove(group_id);
        self.transactions
            .lock()
            .await
            .retain(|_, tx| tx.group_id != group_id);
        Ok(())
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitlyError> {
        Ok(self
            .groups
            .lock()
            .await
            .values()
            .filter(|group| group.is_member(user_id))
            .cloned()
            .collect())
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<(), SplitlyError> {
        self.transactions
            .lock()
            .await
            .insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, SplitlyError> {
        Ok(self.transactions.lock().await.get(transaction_id).cloned())
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<(), SplitlyError> {
        self.transactions.lock().await.remove(transaction_id);
        Ok(())
    }

    async fn get_group_transactions(
        &self,
        group_id: &str,
    ) -> Result<Vec<Transaction>, SplitlyError> {
        // For production: use a database query with an index on group_id
        Ok(self
            .transactions
            .lock()
            .await
            .values()
            .filter(|tx| tx.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitlyError> {
        let mut audits = self.group_audits.lock().await;
        audits.entry(audit.group_id.clone()).or_default().push(audit);
        Ok(())
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitlyError> {
        // For production: add pagination
        Ok(self
            .group_audits
            .lock()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}
