mod balance_tests;
mod user_tests;

use crate::core::models::{NewTransaction, TransactionKind, User};
use crate::core::services::SplitlyService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> SplitlyService<InMemoryLogging, InMemoryStorage, InMemoryCache> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    SplitlyService::new(storage, logging, cache)
}

pub fn test_user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        avatar_url: None,
    }
}

pub fn expense_input(title: &str, amount: f64, paid_by: &str, split: &[&str]) -> NewTransaction {
    NewTransaction {
        title: title.to_string(),
        amount,
        kind: TransactionKind::Expense,
        paid_by: paid_by.to_string(),
        paid_to: None,
        split_between: split.iter().map(|id| id.to_string()).collect(),
        category: None,
        notes: None,
    }
}

pub fn settlement_input(amount: f64, from: &str, to: &str) -> NewTransaction {
    NewTransaction {
        title: format!("Settlement {} to {}", from, to),
        amount,
        kind: TransactionKind::Settlement,
        paid_by: from.to_string(),
        paid_to: Some(to.to_string()),
        split_between: Vec::new(),
        category: None,
        notes: None,
    }
}

pub fn loan_input(amount: f64, lender: &str, borrower: &str) -> NewTransaction {
    NewTransaction {
        title: format!("Loan {} to {}", lender, borrower),
        amount,
        kind: TransactionKind::Loan,
        paid_by: lender.to_string(),
        paid_to: Some(borrower.to_string()),
        split_between: Vec::new(),
        category: None,
        notes: None,
    }
}
