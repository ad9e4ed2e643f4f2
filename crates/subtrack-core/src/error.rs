use std::io;

use subtrack_domain::SubscriptionId;
use thiserror::Error;

/// Malformed input rejected at the construction/update gate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("subscription name must not be empty")]
    EmptyName,
    #[error("cost must be a finite number, got {0}")]
    NonFiniteCost(f64),
    #[error("cost must not be negative, got {0}")]
    NegativeCost(f64),
    #[error("unknown billing cycle `{0}` (expected weekly, monthly, quarterly or yearly)")]
    UnknownBillingCycle(String),
    #[error("invalid currency code `{0}`")]
    InvalidCurrency(String),
    #[error("duplicate subscription id `{0}`")]
    DuplicateId(SubscriptionId),
}

/// Repository load/save failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Corrupt collection: {0}")]
    Corrupt(String),
    #[error("Backup not found: {0}")]
    BackupNotFound(String),
    #[error("Operation not supported by this repository: {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Subscription not found: {0}")]
    NotFound(SubscriptionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type CoreResult<T> = Result<T, CoreError>;
