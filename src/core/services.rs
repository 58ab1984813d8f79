use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CONFIG;
use crate::constants::{
    BALANCES_QUERIED, GROUP_CREATED, GROUP_DELETED, MEMBER_ADDED, MEMBER_REMOVED, PROFILE_UPDATED,
    SUMMARY_QUERIED, TRANSACTION_ADDED, TRANSACTION_DELETED, TRANSACTIONS_QUERIED, USER_ADDED,
};
use crate::core::errors::{FieldError, SplitlyError};
use crate::core::ledger;
use crate::core::models::{
    audit::{AppLog, GroupAudit},
    balance::{Debt, PairwiseBalances, TransactionStats},
    group::Group,
    transaction::{NewTransaction, Transaction, TransactionKind},
    user::User,
};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;

/// Balance view for one group: the raw pairwise ledger, the flat
/// settlement plan, and the netted minimum-transfer plan.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupBalancesResponse {
    balances: PairwiseBalances,
    settlement_plan: Vec<Debt>,
    minimized_plan: Vec<Debt>,
}

impl GroupBalancesResponse {
    pub fn balances(&self) -> &PairwiseBalances {
        &self.balances
    }

    pub fn settlement_plan(&self) -> &[Debt] {
        &self.settlement_plan
    }

    pub fn minimized_plan(&self) -> &[Debt] {
        &self.minimized_plan
    }
}

/// One user's position inside a group: what they are owed, what they owe,
/// and their transaction statistics.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserSummary {
    pub total_owed: f64,
    pub total_owing: f64,
    pub net_balance: f64,
    pub stats: TransactionStats,
}

pub struct SplitlyService<L: LoggingService, S: Storage, C: Cache> {
    storage: S,
    logging: L,
    cache: C,
}

impl<L: LoggingService, S: Storage, C: Cache> SplitlyService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C) -> Self {
        SplitlyService {
            storage,
            logging,
            cache,
        }
    }

    pub async fn validate_users(&self, user_ids: &[&str]) -> Result<(), SplitlyError> {
        for &user_id in user_ids {
            if self.storage.get_user(user_id).await?.is_none() {
                return Err(SplitlyError::UserNotFound(user_id.to_string()));
            }
        }
        Ok(())
    }

    async fn validate_group_membership(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Group, SplitlyError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitlyError::GroupNotFound(group_id.to_string()))?;
        if !group.is_member(user_id) {
            warn!(group_id, user_id, "rejected non-member access");
            return Err(SplitlyError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    async fn validate_group_creator(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Group, SplitlyError> {
        let group = self.validate_group_membership(group_id, user_id).await?;
        if !group.is_creator(user_id) {
            return Err(SplitlyError::NotGroupCreator(user_id.to_string()));
        }
        Ok(group)
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), SplitlyError> {
        self.logging
            .log_action(action, log_details.clone(), user_id)
            .await?;
        if let Some(gid) = group_id {
            self.storage
                .save_group_audit(GroupAudit {
                    id: Uuid::new_v4().to_string(),
                    group_id: gid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    fn validate_string_input(
        &self,
        field: &str,
        value: &str,
        max_length: usize,
    ) -> Result<(), SplitlyError> {
        if value.trim().is_empty() {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.len() > max_length {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), SplitlyError> {
        if amount <= 0.0 {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be greater than 0".to_string(),
                },
            ));
        }
        if amount > 1_000_000.0 {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: "Amount cannot exceed 1,000,000".to_string(),
                },
            ));
        }
        if !amount.is_finite() {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be a finite number".to_string(),
                },
            ));
        }
        if (amount * 100.0).round() / 100.0 != amount {
            return Err(SplitlyError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount cannot have more than 2 decimal places".to_string(),
                },
            ));
        }
        Ok(())
    }

    async fn resolve_members(&self, group: &Group) -> Result<Vec<User>, SplitlyError> {
        try_join_all(group.members.iter().map(|member_id| async move {
            self.storage
                .get_user(member_id)
                .await?
                .ok_or_else(|| SplitlyError::UserNotFound(member_id.clone()))
        }))
        .await
    }

    // USERS

    pub async fn add_user(
        &self,
        user: User,
        created_by: Option<&User>,
    ) -> Result<User, SplitlyError> {
        if user.email.is_empty() {
            return Err(SplitlyError::MissingEmail);
        }
        if !user.email.contains('@') || !user.email.contains('.') || user.email.len() < 5 {
            return Err(SplitlyError::InvalidEmail(user.email.clone()));
        }
        self.validate_string_input("name", &user.name, 100)?;

        let created = self.storage.create_user(user).await?;
        info!(user_id = %created.id, "user added");

        self.log_and_audit(
            None,
            USER_ADDED,
            json!({ "user_id": created.id, "name": created.name, "email": created.email }),
            created_by.map(|u| u.id.as_str()),
        )
        .await?;

        Ok(created)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitlyError> {
        self.storage.get_user(user_id).await
    }

    /// Updates the caller's display name and/or avatar; the email is fixed
    /// at registration.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<User, SplitlyError> {
        let mut user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| SplitlyError::UserNotFound(user_id.to_string()))?;

        if let Some(name) = name {
            self.validate_string_input("name", &name, 100)?;
            user.name = name;
        }
        if let Some(avatar_url) = avatar_url {
            self.validate_string_input("avatar_url", &avatar_url, 255)?;
            user.avatar_url = Some(avatar_url);
        }

        self.storage.save_user(user.clone()).await?;

        self.log_and_audit(
            None,
            PROFILE_UPDATED,
            json!({ "user_id": user.id, "name": user.name, "avatar_url": user.avatar_url }),
            Some(user_id),
        )
        .await?;

        Ok(user)
    }

    // GROUPS

    pub async fn create_group(
        &self,
        name: String,
        members: Vec<User>,
        created_by: &User,
    ) -> Result<Group, SplitlyError> {
        self.validate_users(&[&created_by.id]).await?;
        self.validate_string_input("name", &name, 100)?;

        let mut member_ids: Vec<String> = members.into_iter().map(|user| user.id).collect();
        if !member_ids.iter().any(|id| id == &created_by.id) {
            member_ids.insert(0, created_by.id.clone());
        }
        let mut seen = HashSet::new();
        member_ids.retain(|id| seen.insert(id.clone()));

        self.validate_users(&member_ids.iter().map(|id| id.as_str()).collect::<Vec<_>>())
            .await?;

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            created_by: created_by.id.clone(),
            members: member_ids,
            created_at: Utc::now(),
        };
        self.storage.save_group(group.clone()).await?;
        info!(group_id = %group.id, "group created");

        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({
                "group_id": group.id,
                "name": group.name,
                "member_ids": group.members
            }),
            Some(created_by.id.as_str()),
        )
        .await?;

        Ok(group)
    }

    /// Deletes a group and its transaction history. Creator only.
    pub async fn delete_group(&self, group_id: &str, deleted_by: &User) -> Result<(), SplitlyError> {
        let group = self.validate_group_creator(group_id, &deleted_by.id).await?;
        self.storage.delete_group(group_id).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            GROUP_DELETED,
            json!({ "group_id": group_id, "name": group.name }),
            Some(deleted_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitlyError> {
        self.storage.get_group(group_id).await
    }

    /// Groups the user belongs to, newest first.
    pub async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitlyError> {
        self.validate_users(&[user_id]).await?;
        let mut groups = self.storage.get_user_groups(user_id).await?;
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    pub async fn get_group_members(
        &self,
        group_id: &str,
        queried_by: &User,
    ) -> Result<Vec<User>, SplitlyError> {
        let group = self
            .validate_group_membership(group_id, &queried_by.id)
            .await?;
        self.resolve_members(&group).await
    }

    pub async fn add_member_to_group(
        &self,
        group_id: &str,
        user: &User,
        added_by: &User,
    ) -> Result<(), SplitlyError> {
        let mut group = self
            .validate_group_membership(group_id, &added_by.id)
            .await?;
        self.validate_users(&[&user.id]).await?;

        if group.is_member(&user.id) {
            return Err(SplitlyError::AlreadyGroupMember(user.id.clone()));
        }

        group.members.push(user.id.clone());
        self.storage.save_group(group).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_ADDED,
            json!({ "group_id": group_id, "user_id": user.id, "name": user.name }),
            Some(added_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    /// Removes a member. Creator only, and the creator themselves can
    /// never be removed.
    pub async fn remove_member_from_group(
        &self,
        group_id: &str,
        user_id: &str,
        removed_by: &User,
    ) -> Result<(), SplitlyError> {
        let mut group = self
            .validate_group_creator(group_id, &removed_by.id)
            .await?;

        if user_id == group.created_by {
            return Err(SplitlyError::CreatorCannotBeRemoved);
        }
        if !group.is_member(user_id) {
            return Err(SplitlyError::NotGroupMember(user_id.to_string()));
        }

        group.members.retain(|id| id != user_id);
        self.storage.save_group(group).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            MEMBER_REMOVED,
            json!({ "group_id": group_id, "user_id": user_id }),
            Some(removed_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    // TRANSACTIONS

    pub async fn create_transaction(
        &self,
        group_id: &str,
        input: NewTransaction,
        created_by: &User,
    ) -> Result<Transaction, SplitlyError> {
        let group = self
            .validate_group_membership(group_id, &created_by.id)
            .await?;

        self.validate_string_input("title", &input.title, 255)?;
        if let Some(notes) = &input.notes {
            self.validate_string_input("notes", notes, 500)?;
        }
        self.validate_amount_input("amount", input.amount)?;

        if !group.is_member(&input.paid_by) {
            return Err(SplitlyError::NotGroupMember(input.paid_by.clone()));
        }

        let (paid_to, split_between) = match input.kind {
            TransactionKind::Expense => {
                if input.paid_to.is_some() {
                    return Err(SplitlyError::InvalidInput(
                        "paid_to".to_string(),
                        FieldError {
                            field: "paid_to".to_string(),
                            title: "Unexpected Counterparty".to_string(),
                            description: "An expense has participants, not a counterparty"
                                .to_string(),
                        },
                    ));
                }
                if input.split_between.is_empty() {
                    return Err(SplitlyError::EmptySplit);
                }
                let mut seen = HashSet::new();
                for participant in &input.split_between {
                    if !seen.insert(participant.as_str()) {
                        return Err(SplitlyError::InvalidInput(
                            "split_between".to_string(),
                            FieldError {
                                field: "split_between".to_string(),
                                title: "Duplicate Participant".to_string(),
                                description: format!("User {} listed more than once", participant),
                            },
                        ));
                    }
                    if !group.is_member(participant) {
                        return Err(SplitlyError::UnknownParticipant(participant.clone()));
                    }
                }
                if let Some(category) = &input.category {
                    self.validate_string_input("category", category, 50)?;
                }
                (None, input.split_between.clone())
            }
            TransactionKind::Settlement | TransactionKind::Loan => {
                let paid_to = input
                    .paid_to
                    .clone()
                    .ok_or_else(|| SplitlyError::MissingCounterparty(input.kind.to_string()))?;
                if paid_to == input.paid_by {
                    return Err(SplitlyError::SelfTransfer);
                }
                if !group.is_member(&paid_to) {
                    return Err(SplitlyError::NotGroupMember(paid_to.clone()));
                }
                if input.category.is_some() {
                    return Err(SplitlyError::InvalidInput(
                        "category".to_string(),
                        FieldError {
                            field: "category".to_string(),
                            title: "Unexpected Category".to_string(),
                            description: "Only expenses carry a category".to_string(),
                        },
                    ));
                }
                let split = vec![input.paid_by.clone(), paid_to.clone()];
                (Some(paid_to), split)
            }
        };

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            title: input.title,
            amount: input.amount,
            kind: input.kind,
            paid_by: input.paid_by,
            paid_to,
            split_between,
            category: input.category,
            notes: input.notes,
            created_at: Utc::now(),
        };

        self.storage.save_transaction(transaction.clone()).await?;
        self.cache.invalidate_group_balances(group_id).await?;
        info!(transaction_id = %transaction.id, kind = %transaction.kind, "transaction recorded");

        self.log_and_audit(
            Some(group_id),
            TRANSACTION_ADDED,
            json!({
                "transaction_id": transaction.id,
                "group_id": group_id,
                "kind": transaction.kind,
                "title": transaction.title,
                "amount": transaction.amount,
                "paid_by": transaction.paid_by
            }),
            Some(created_by.id.as_str()),
        )
        .await?;

        Ok(transaction)
    }

    /// Hard-deletes a transaction. Any group member may do this.
    pub async fn delete_transaction(
        &self,
        transaction_id: &str,
        deleted_by: &User,
    ) -> Result<(), SplitlyError> {
        let transaction = self
            .storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| SplitlyError::TransactionNotFound(transaction_id.to_string()))?;
        self.validate_group_membership(&transaction.group_id, &deleted_by.id)
            .await?;

        self.storage.delete_transaction(transaction_id).await?;
        self.cache
            .invalidate_group_balances(&transaction.group_id)
            .await?;

        self.log_and_audit(
            Some(&transaction.group_id),
            TRANSACTION_DELETED,
            json!({ "transaction_id": transaction_id, "group_id": transaction.group_id }),
            Some(deleted_by.id.as_str()),
        )
        .await?;
        Ok(())
    }

    /// A group's transactions, newest first.
    pub async fn get_group_transactions(
        &self,
        group_id: &str,
        queried_by: &User,
    ) -> Result<Vec<Transaction>, SplitlyError> {
        self.validate_group_membership(group_id, &queried_by.id)
            .await?;
        let mut transactions = self.storage.get_group_transactions(group_id).await?;
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        self.log_and_audit(
            Some(group_id),
            TRANSACTIONS_QUERIED,
            json!({ "group_id": group_id, "user_id": queried_by.id }),
            Some(queried_by.id.as_str()),
        )
        .await?;
        Ok(transactions)
    }

    // BALANCES

    /// Recomputes the group's pairwise ledger and settlement plans from the
    /// current transaction snapshot, with a per-group cache in front.
    pub async fn get_group_balances(
        &self,
        group_id: &str,
        queried_by: &User,
    ) -> Result<GroupBalancesResponse, SplitlyError> {
        let group = self
            .validate_group_membership(group_id, &queried_by.id)
            .await?;

        if let Some(cached) = self.cache.get_group_balances(group_id).await? {
            debug!(group_id, "balance cache hit");
            return Ok(cached);
        }

        let transactions = self.storage.get_group_transactions(group_id).await?;
        let members = self.resolve_members(&group).await?;

        let balances = ledger::compute_balances(&transactions, &members);
        let settlement_plan = ledger::settlement_plan(&balances);
        let minimized_plan = ledger::min_cash_flow(&balances);

        let response = GroupBalancesResponse {
            balances,
            settlement_plan,
            minimized_plan,
        };
        self.cache
            .save_group_balances(
                group_id,
                &response,
                Duration::from_secs(CONFIG.balance_cache_ttl_secs),
            )
            .await?;

        self.log_and_audit(
            Some(group_id),
            BALANCES_QUERIED,
            json!({ "group_id": group_id, "user_id": queried_by.id }),
            Some(queried_by.id.as_str()),
        )
        .await?;

        Ok(response)
    }

    /// One member's totals and statistics inside a group.
    pub async fn get_user_summary(
        &self,
        group_id: &str,
        user_id: &str,
        queried_by: &User,
    ) -> Result<UserSummary, SplitlyError> {
        let group = self
            .validate_group_membership(group_id, &queried_by.id)
            .await?;
        if !group.is_member(user_id) {
            return Err(SplitlyError::NotGroupMember(user_id.to_string()));
        }

        let response = self.get_group_balances(group_id, queried_by).await?;
        let transactions = self.storage.get_group_transactions(group_id).await?;

        let total_owed = ledger::total_owed_to(user_id, response.balances());
        let total_owing = ledger::total_owed_by(user_id, response.balances());
        let stats = ledger::transaction_stats(&transactions, user_id);

        self.log_and_audit(
            Some(group_id),
            SUMMARY_QUERIED,
            json!({ "group_id": group_id, "user_id": user_id }),
            Some(queried_by.id.as_str()),
        )
        .await?;

        Ok(UserSummary {
            total_owed,
            total_owing,
            net_balance: total_owed - total_owing,
            stats,
        })
    }

    /// Outstanding debt from `from_id` to `to_id`, if any: the amount a
    /// settle-up form would pre-fill.
    pub async fn suggest_settlement_amount(
        &self,
        group_id: &str,
        from_id: &str,
        to_id: &str,
        queried_by: &User,
    ) -> Result<Option<f64>, SplitlyError> {
        let response = self.get_group_balances(group_id, queried_by).await?;
        let balance = ledger::balance_between(response.balances(), from_id, to_id);
        Ok((balance < 0.0).then(|| balance.abs()))
    }

    // AUDIT

    pub async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitlyError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitlyError::GroupNotFound(group_id.to_string()))?;
        self.storage.get_group_audits(group_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, SplitlyError> {
        self.logging.get_logs().await
    }
}
