//! Shell state, dispatch, and error reporting.

use std::io;

use subtrack_config::{default_data_root, Config, ConfigManager};
use subtrack_core::CoreError;
use subtrack_domain::{Subscription, SubscriptionId};
use subtrack_storage_json::JsonSubscriptionStorage;
use thiserror::Error;
use tracing::warn;

use crate::cli::commands;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::core::SubscriptionManager;
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Failure of a single command; the shell reports it and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`")]
    UnknownCommand(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub manager: SubscriptionManager,
    pub config: Config,
    pub registry: CommandRegistry,
    pub running: bool,
}

impl ShellContext {
    /// Opens the tracker home (`SUBTRACK_HOME` or the platform data dir).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = default_data_root();
        let config = ConfigManager::with_base_dir(home)?.load()?;
        let storage =
            JsonSubscriptionStorage::with_retention(config.resolve_data_root(), config.backup_retention)?;
        let manager = SubscriptionManager::with_system_clock(Box::new(storage));
        let mut context = Self::with_manager(mode, manager, config);
        if let Err(err) = context.manager.load() {
            warn!(error = %err, "starting with an empty collection");
            output::warning(format!("Could not load saved subscriptions: {err}"));
        }
        Ok(context)
    }

    pub fn with_manager(mode: CliMode, mut manager: SubscriptionManager, config: Config) -> Self {
        manager.set_default_currency(config.currency.clone());
        output::set_preferences(output::OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });
        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }
        Self {
            mode,
            manager,
            config,
            registry,
            running: true,
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        format!("subtrack ({})> ", self.manager.list().len())
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            return Err(CommandError::UnknownCommand(command.to_string()));
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            Err(err) => Err(err),
        }
    }

    /// Accepts a full id or an unambiguous prefix of one.
    pub fn resolve_id(&self, raw: &str) -> Result<SubscriptionId, CommandError> {
        let raw = raw.trim();
        let exact = SubscriptionId::from(raw);
        if self.manager.get(&exact).is_ok() {
            return Ok(exact);
        }
        let matches: Vec<&Subscription> = self
            .manager
            .list()
            .iter()
            .filter(|sub| !raw.is_empty() && sub.id.as_str().starts_with(raw))
            .collect();
        match matches.as_slice() {
            [single] => Ok(single.id.clone()),
            [] => Err(CommandError::Core(CoreError::NotFound(exact))),
            _ => Err(CommandError::InvalidArguments(format!(
                "id prefix `{raw}` matches {} subscriptions",
                matches.len()
            ))),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        if let Some(best) = self.registry.suggest(input) {
            output::hint(format!("Did you mean `{best}`?"));
        }
    }

    pub fn report_error(&self, err: &CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::UnknownCommand(raw) => {
                output::error(format!("Unknown command `{raw}`. Type `help` to see available commands."));
                self.suggest_command(raw);
            }
            other => output::error(other),
        }
    }
}
