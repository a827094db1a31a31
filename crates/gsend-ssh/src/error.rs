//! SSH-specific error types

use thiserror::Error;
use std::io;

/// Transport-specific errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connect or SSH handshake failed
    #[error("unable to connect to [{addr}]: {message}")]
    Connection {
        /// Address that was dialed
        addr: String,
        /// Underlying failure
        message: String,
    },

    /// Server identity could not be verified
    #[error("host key verification failed for [{addr}]: {message}")]
    HostKey {
        /// Address whose key was checked
        addr: String,
        /// Why verification failed
        message: String,
    },

    /// Every offered authentication method was rejected
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// SFTP subsystem could not be started
    #[error("unable to start sftp subsystem: {0}")]
    Sftp(String),

    /// Remote file could not be created or truncated
    #[error("unable to create remote file {path}: {message}")]
    RemoteCreate {
        /// Remote path that was opened
        path: String,
        /// Underlying failure
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}
