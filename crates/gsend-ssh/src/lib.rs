//! # gsend SSH Transport
//!
//! SSH session establishment and SFTP file access for gsend, built on libssh2.

#![warn(missing_docs)]

/// Transport abstraction and the libssh2 implementation
pub mod transport;

/// Authenticated SFTP connection
pub mod connection;

/// Authentication method planning
pub mod auth;

/// Host identity verification
pub mod host_key;

/// SSH-specific error types
pub mod error;

pub use transport::{Transport, RemoteFs, RemoteFile, Ssh2Transport, SshConfig, ConnectionInfo, MAX_PACKET_SIZE};
pub use connection::Connection;
pub use auth::{AuthMethod, AuthPlan, AGENT_SOCKET_ENV};
pub use host_key::HostKeyPolicy;
pub use error::TransportError;
