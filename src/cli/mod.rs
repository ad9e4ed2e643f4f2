//! Command shell over [`SubscriptionManager`](crate::core::SubscriptionManager).

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
pub mod render;
pub mod shell;

pub use context::{CliMode, CommandError, ShellContext};
pub use shell::{run_cli, run_once, run_script};
