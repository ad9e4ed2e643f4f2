use std::io;

use rustyline::error::ReadlineError;
use subtrack_config::ConfigError;
use subtrack_core::{CoreError, StorageError, ValidationError};
use thiserror::Error;

/// Unified error type for the application layers.
#[derive(Debug, Error)]
pub enum SubtrackError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<StorageError> for SubtrackError {
    fn from(err: StorageError) -> Self {
        SubtrackError::Core(CoreError::Storage(err))
    }
}

impl From<ValidationError> for SubtrackError {
    fn from(err: ValidationError) -> Self {
        SubtrackError::Core(CoreError::Validation(err))
    }
}

pub type Result<T> = std::result::Result<T, SubtrackError>;

/// Fatal shell errors; per-command failures are reported and the shell keeps going.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] SubtrackError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(err.into())
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::App(err.into())
    }
}
