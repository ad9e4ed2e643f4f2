//! subtrack-domain
//!
//! Pure domain models (Subscription, BillingCycle, category catalog).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod billing_cycle;
pub mod category;
pub mod subscription;

pub use billing_cycle::*;
pub use category::*;
pub use subscription::*;
