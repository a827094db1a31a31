//! Transport abstraction and implementations

use crate::{AuthPlan, Connection, HostKeyPolicy, TransportError};
use ssh2::Session;
use std::io::{self, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use tracing::{debug, info};

/// Maximum SFTP packet payload used for uploads
pub const MAX_PACKET_SIZE: usize = 1 << 15;

/// Transport abstraction for reaching a remote file system
pub trait Transport {
    /// Connect, authenticate and open a file-transfer session
    fn connect(
        &mut self,
        config: &SshConfig,
        auth: &AuthPlan,
    ) -> Result<Box<dyn RemoteFs>, TransportError>;
}

/// Remote file system reachable through an open transfer session
pub trait RemoteFs {
    /// Create or truncate a remote file and return a handle for writing it
    fn create(&mut self, path: &str) -> Result<Box<dyn RemoteFile + '_>, TransportError>;

    /// Get connection information
    fn connection_info(&self) -> &ConnectionInfo;
}

/// Writable handle to a remote file
///
/// Dropping the handle releases it silently. Call [`RemoteFile::close`] to
/// learn whether the server accepted the final state of the file.
pub trait RemoteFile: Write {
    /// Release the handle on the server
    fn close(&mut self) -> io::Result<()>;
}

/// Connection information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Remote hostname or IP
    pub host: String,
    /// Remote port
    pub port: u16,
    /// Username
    pub username: String,
}

/// SSH configuration
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Remote hostname or IP
    pub host: String,
    /// Remote port (default: 22)
    pub port: u16,
    /// Username
    pub username: String,
    /// Host key verification policy
    pub host_key_policy: HostKeyPolicy,
    /// OpenSSH known_hosts file consulted by [`HostKeyPolicy::KnownHosts`]
    pub known_hosts: Option<PathBuf>,
}

impl SshConfig {
    /// `host:port` string used for dialing and messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection information for this configuration
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
        }
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 22,
            username: String::new(),
            host_key_policy: HostKeyPolicy::default(),
            known_hosts: dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts")),
        }
    }
}

/// SSH transport implemented with libssh2
#[derive(Debug, Default)]
pub struct Ssh2Transport;

impl Ssh2Transport {
    /// Create a new libssh2 transport
    pub fn new() -> Self {
        Self
    }

    /// Dial the server and complete the SSH handshake
    fn handshake(&self, config: &SshConfig) -> Result<Session, TransportError> {
        let addr = config.addr();
        let connection_error = |message: String| TransportError::Connection {
            addr: addr.clone(),
            message,
        };

        debug!("Dialing {}", addr);
        let tcp = TcpStream::connect((config.host.as_str(), config.port))
            .map_err(|e| connection_error(e.to_string()))?;

        let mut session = Session::new().map_err(|e| connection_error(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| connection_error(format!("SSH handshake failed: {}", e)))?;

        Ok(session)
    }
}

impl Transport for Ssh2Transport {
    fn connect(
        &mut self,
        config: &SshConfig,
        auth: &AuthPlan,
    ) -> Result<Box<dyn RemoteFs>, TransportError> {
        if config.host.is_empty() || config.port == 0 {
            return Err(TransportError::Configuration(format!(
                "invalid address [{}]",
                config.addr()
            )));
        }

        info!("Connecting to {}@{}", config.username, config.addr());

        let session = self.handshake(config)?;
        config
            .host_key_policy
            .verify(&session, &config.host, config.port, config.known_hosts.as_deref())?;
        auth.authenticate(&session, &config.username)?;

        let connection = Connection::open(session, config.connection_info())?;
        info!("Connected to {}@{}", config.username, config.addr());
        Ok(Box::new(connection))
    }
}
