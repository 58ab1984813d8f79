use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Settlement,
    Loan,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Settlement => "settlement",
            TransactionKind::Loan => "loan",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub paid_by: String,
    /// Counterparty; set for settlements and loans, absent for expenses.
    pub paid_to: Option<String>,
    pub split_between: Vec<String>,
    /// Expense category; expenses only.
    pub category: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input shape for recording a transaction. The id and timestamp are
/// assigned by the service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub paid_by: String,
    pub paid_to: Option<String>,
    pub split_between: Vec<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}
