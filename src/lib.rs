#![doc(test(attr(deny(warnings))))]

//! Subtrack keeps a personal collection of recurring subscriptions and answers
//! what they cost, when each one charges next, and how far along the current
//! billing cycle is.
//!
//! The heavy lifting lives in the workspace crates; this crate wires them into
//! an application facade ([`core::SubscriptionManager`]) and a command shell.

pub mod cli;
pub mod core;
pub mod errors;
pub mod utils;

pub use subtrack_config as config;
pub use subtrack_core as services;
pub use subtrack_domain as domain;
pub use subtrack_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(version = build.version, "Subtrack tracing initialized.");
    });
}
