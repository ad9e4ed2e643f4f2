//! subtrack-core
//!
//! Cycle math, aggregation and the validation gate for subscription records.
//! Depends on subtrack-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod cycle_math;
pub mod error;
pub mod format;
pub mod storage;
pub mod subscription_service;
pub mod summary_service;
pub mod time;
pub mod validation;

pub use cycle_math::*;
pub use error::{CoreError, CoreResult, StorageError, ValidationError};
pub use storage::{BackupInfo, MemoryRepository, SubscriptionRepository};
pub use subscription_service::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
