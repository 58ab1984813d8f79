use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Signed net position one user holds against another. Positive means the
/// other user owes this one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BalanceEntry {
    pub user_id: String,
    pub amount: f64,
}

/// Per-user pairwise balances, keyed by user id. Settled pairs are omitted.
pub type PairwiseBalances = HashMap<String, Vec<BalanceEntry>>;

/// One simplified obligation: `from` pays `to` the given positive amount.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Per-user totals and counts folded from a group's transaction history.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionStats {
    pub total_spent: f64,
    pub total_paid: f64,
    pub total_received: f64,
    pub total_loaned: f64,
    pub total_borrowed: f64,
    pub expense_count: usize,
    pub settlement_count: usize,
    pub loan_count: usize,
}
