use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum SplitlyError {
    #[error("Email is required")]
    MissingEmail,
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Group {0} not found")]
    GroupNotFound(String),
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),
    #[error("User {0} is not a group member")]
    NotGroupMember(String),
    #[error("User {0} did not create this group")]
    NotGroupCreator(String),
    #[error("Group creator cannot be removed")]
    CreatorCannotBeRemoved,
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),
    #[error("Cannot record a transfer to self")]
    SelfTransfer,
    #[error("A {0} requires a counterparty")]
    MissingCounterparty(String),
    #[error("Expense split cannot be empty")]
    EmptySplit,
    #[error("User {0} in split is not a group member")]
    UnknownParticipant(String),
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
}
