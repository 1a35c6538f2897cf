//! Error types for the terminal collaborator and the options loader

use thiserror::Error;

/// Failure of the terminal (or scripted) user interface
#[derive(Debug, Error)]
pub enum UiError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The input source ran out of keys
    #[error("input closed")]
    InputClosed,
}

/// Failure to read or parse the options file
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("could not read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value for option '{0}': {1}")]
    InvalidValue(String, String),

    #[error("missing value for option '{0}'")]
    MissingValue(String),
}
