/// Amounts closer to zero than this are treated as settled when building
/// net cash-flow plans.
pub const SPLIT_TOLERANCE: f64 = 0.01;

// Audit action names.
pub const USER_ADDED: &str = "USER_ADDED";
pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const GROUP_DELETED: &str = "GROUP_DELETED";
pub const MEMBER_ADDED: &str = "MEMBER_ADDED";
pub const MEMBER_REMOVED: &str = "MEMBER_REMOVED";
pub const TRANSACTION_ADDED: &str = "TRANSACTION_ADDED";
pub const TRANSACTION_DELETED: &str = "TRANSACTION_DELETED";
pub const TRANSACTIONS_QUERIED: &str = "TRANSACTIONS_QUERIED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";
pub const SUMMARY_QUERIED: &str = "SUMMARY_QUERIED";
