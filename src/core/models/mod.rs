pub mod audit;
pub mod balance;
pub mod group;
pub mod transaction;
pub mod user;

pub use audit::{AppLog, GroupAudit};
pub use balance::{BalanceEntry, Debt, PairwiseBalances, TransactionStats};
pub use group::Group;
pub use transaction::{NewTransaction, Transaction, TransactionKind};
pub use user::User;
