// src/error.rs

//! Crate-wide error type
//!
//! Every fallible operation in the library returns [`Result`]. Resolution
//! errors carry the dependency name and the offending string so callers can
//! print an actionable message without re-deriving context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid reference {reference:?}: {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("dependency {name:?} has an invalid version/constraint format {constraint:?}: {reason}")]
    InvalidConstraint {
        name: String,
        constraint: String,
        reason: String,
    },

    #[error("chart {name:?} not found in {repository}: {reason}")]
    ChartNotFound {
        name: String,
        repository: String,
        reason: String,
    },

    #[error("no cached repository index for {name:?}: {reason}; refresh the repository cache")]
    RepoIndexMissing { name: String, reason: String },

    #[error("invalid repository index {}: {reason}", path.display())]
    RepoIndexInvalid { path: PathBuf, reason: String },

    #[error("no version of {name:?} in {repository} satisfies {constraint:?}")]
    NoMatchingVersion {
        name: String,
        repository: String,
        constraint: String,
    },

    #[error("cannot attach chart {child:?} under {parent:?}: it is already an ancestor")]
    ChartCycle { parent: String, child: String },

    #[error("invalid chart at {}: {reason}", path.display())]
    InvalidChart { path: PathBuf, reason: String },

    #[error("lock is out of date: {0}")]
    StaleLock(String),

    #[error("hook {name:?} is already registered")]
    DuplicateHook { name: String },

    #[error("hook {name:?} failed during {phase}: {reason}")]
    HookFailed {
        name: String,
        phase: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::ParseError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializeError(e.to_string())
    }
}
