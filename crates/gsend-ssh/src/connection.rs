//! Authenticated SFTP connection

use crate::{ConnectionInfo, RemoteFile, RemoteFs, TransportError};
use ssh2::{File, OpenFlags, OpenType, Session, Sftp};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Permissions given to files created on the remote side
const REMOTE_FILE_MODE: i32 = 0o644;

/// Authenticated SSH session with an open SFTP subsystem
pub struct Connection {
    /// SFTP handle, dropped before the session
    sftp: Sftp,
    /// Underlying SSH session
    session: Session,
    /// Connection information
    info: ConnectionInfo,
}

impl Connection {
    /// Start the SFTP subsystem on an authenticated session
    pub fn open(session: Session, info: ConnectionInfo) -> Result<Self, TransportError> {
        let sftp = session
            .sftp()
            .map_err(|e| TransportError::Sftp(e.to_string()))?;
        debug!("SFTP subsystem started");

        Ok(Self { sftp, session, info })
    }
}

impl RemoteFs for Connection {
    fn create(&mut self, path: &str) -> Result<Box<dyn RemoteFile + '_>, TransportError> {
        debug!("Creating remote file {}", path);

        let flags = OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE;
        let file = self
            .sftp
            .open_mode(Path::new(path), flags, REMOTE_FILE_MODE, OpenType::File)
            .map_err(|e| TransportError::RemoteCreate {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(Box::new(file))
    }

    fn connection_info(&self) -> &ConnectionInfo {
        &self.info
    }
}

impl RemoteFile for File {
    fn close(&mut self) -> io::Result<()> {
        File::close(self).map_err(io::Error::from)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Closing connection to {}:{}", self.info.host, self.info.port);
        if let Err(e) = self.session.disconnect(None, "transfer finished", None) {
            warn!("Failed to disconnect cleanly: {}", e);
        }
    }
}
