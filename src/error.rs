//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure produced while locating, reading, or parsing a config file.
///
/// Each variant keeps the lower-level error as its [`source`](std::error::Error::source).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read configuration file {}: {source}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The home directory of the current user could not be determined.
    #[error("cannot retrieve home directory for application {app}: {source}")]
    UserLookup {
        /// Application whose config file was being located.
        app: String,
        /// Underlying lookup failure.
        #[source]
        source: io::Error,
    },

    /// The buffer is not valid YAML or does not fit the destination type.
    #[error("cannot read configuration: {source}")]
    Parse {
        /// Underlying parser failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// The document fits the destination type, but the destination's current
    /// value could not be carried over.
    ///
    /// Raised when the destination cannot be serialized, or when its
    /// serialized form is rejected by its own `Deserialize` impl (for example
    /// a `deserialize_with` field without a matching `serialize_with`).
    #[error("cannot merge configuration into existing value: {source}")]
    Destination {
        /// Underlying serialization or deserialization failure.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// File I/O failed (missing file, permissions, ...).
    ReadFailure,
    /// The invoking user's home directory is unknown.
    UserLookupFailure,
    /// YAML could not be parsed or did not match the destination shape.
    ParseFailure,
    /// The destination's current value does not survive a serde round trip.
    DestinationFailure,
}

impl ConfigError {
    /// Returns which stage of the pipeline failed.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } => ErrorKind::ReadFailure,
            Self::UserLookup { .. } => ErrorKind::UserLookupFailure,
            Self::Parse { .. } => ErrorKind::ParseFailure,
            Self::Destination { .. } => ErrorKind::DestinationFailure,
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse { source }
    }
}

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
