//! # gsend
//!
//! Upload a single file to a named SFTP destination.
//!
//! Destinations are kept in a small YAML config. A run validates the
//! request, asks for a password, connects over SSH (agent keys first, then
//! the password) and streams the file to `<location path>/<file name>`.

#![warn(missing_docs)]

pub use gsend_ssh as ssh;

/// Error types for gsend
pub mod error;

/// Configuration file handling
pub mod config;

/// Command line parsing
pub mod cli;

/// Interactive credential acquisition
pub mod credentials;

/// Validated upload request
pub mod context;

/// Streaming file transfer
pub mod transfer;

/// Upload session orchestration
pub mod session;

pub use error::GsendError;
pub use config::{Config, Location};
pub use cli::{Cli, Invocation};
pub use credentials::{PasswordPrompt, TerminalPrompt, FixedPassword};
pub use context::UploadRequest;
pub use session::{Session, UploadArgs};

/// Result type alias for gsend operations
pub type Result<T> = std::result::Result<T, GsendError>;
