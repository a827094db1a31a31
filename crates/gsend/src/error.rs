//! Error types for gsend

use gsend_ssh::TransportError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gsend operations
#[derive(Debug, Error)]
pub enum GsendError {
    /// No configuration existed; a default one was written in its place
    #[error("config not found: a default config was written to {}, fill it in and retry", path.display())]
    ConfigNotFound {
        /// Location of the freshly written config
        path: PathBuf,
    },

    /// Writing the default configuration failed
    #[error("config not found and writing a default to {} failed: {source}", path.display())]
    ConfigWrite {
        /// Location that could not be written
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },

    /// Reading or parsing the configuration failed
    #[error("unable to parse config {}: {message}", path.display())]
    ConfigParse {
        /// Location of the config
        path: PathBuf,
        /// Parser or read failure
        message: String,
    },

    /// The platform has no per-user configuration directory
    #[error("no user configuration directory available")]
    ConfigDirUnavailable,

    /// Command line did not match the expected usage
    #[error("invalid usage: {reason}")]
    InvalidUsage {
        /// Usage text shown to the operator
        usage: String,
        /// What was wrong with the arguments
        reason: String,
    },

    /// Source file does not exist
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Source path exists but is not a regular file
    #[error("source is not a regular file: {}", .0.display())]
    SourceNotAFile(PathBuf),

    /// Source file name cannot be expressed as a remote path
    #[error("source file name is not valid UTF-8: {}", .0.display())]
    SourceNameNotUtf8(PathBuf),

    /// Destination name is not present in the configuration
    #[error("destination not found in config: {0}")]
    DestinationNotFound(String),

    /// Destination entry cannot be dialed
    #[error("invalid destination {name}: {reason}")]
    InvalidDestination {
        /// Destination name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Password could not be read from the terminal
    #[error("unable to read password: {0}")]
    TerminalRead(io::Error),

    /// Connection, authentication or remote file errors
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Local source could not be opened
    #[error("unable to open {}: {source}", path.display())]
    SourceOpen {
        /// Source path
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },

    /// Streaming bytes to the remote file failed
    #[error("copy to {remote} failed: {source}")]
    Copy {
        /// Remote target path
        remote: String,
        /// Underlying failure
        source: io::Error,
    },
}
