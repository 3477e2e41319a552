//! Layered configuration loading.
//!
//! A resource name resolves to a base properties file and/or a sibling
//! `<name>.d/` directory of numbered fragments. [`ConfigReader`] merges them
//! into one read-only table: base first, then fragments in file-name order.

pub mod loader;

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::NULL_RESOURCE_MESSAGE;
use crate::properties::ParseError;
use crate::resolve::{Location, LocationError};

pub use loader::ConfigReader;

/// Broad classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed an unusable resource name.
    InvalidArgument,
    /// Neither the base file nor the override directory exists.
    NotFound,
    /// A resolved file or directory could not be read, parsed or located.
    Io,
}

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{}", NULL_RESOURCE_MESSAGE)]
    NullResourceName,

    #[error("Unable to find configuration files for resource name: {resource}")]
    NotFound { resource: String },

    #[error("Error while reading configuration: {resource}: {source}")]
    Location {
        resource: String,
        location: Location,
        source: LocationError,
    },

    #[error("Unable to load configuration file: {file}: {source}")]
    ReadFile {
        file: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to load configuration file: {file}: {source}")]
    ParseFile {
        file: String,
        path: PathBuf,
        source: ParseError,
    },

    #[error("Unable to list configuration directory: {file}: {source}")]
    ReadDirectory {
        file: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NullResourceName => ErrorKind::InvalidArgument,
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::Location { .. }
            | ConfigError::ReadFile { .. }
            | ConfigError::ParseFile { .. }
            | ConfigError::ReadDirectory { .. } => ErrorKind::Io,
        }
    }

    /// The file or directory the error concerns, when one is known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ConfigError::ReadFile { path, .. }
            | ConfigError::ParseFile { path, .. }
            | ConfigError::ReadDirectory { path, .. } => Some(path),
            _ => None,
        }
    }
}
