//! Upload request context
//!
//! An [`UploadRequest`] is built once from the command line and the loaded
//! configuration, then handed to every later step.

use crate::config::{Config, Location};
use crate::transfer::remote_target;
use crate::{GsendError, Result};
use gsend_ssh::SshConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A validated upload of one local file to one named destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Local file to send
    source: PathBuf,
    /// Destination name as given on the command line
    destination: String,
    /// Resolved destination
    location: Location,
    /// User to authenticate as
    username: String,
    /// Full remote path of the uploaded file
    remote_path: String,
}

impl UploadRequest {
    /// Validate the source and destination against the configuration.
    ///
    /// Touches only the local file system; nothing is dialed here.
    pub fn resolve(source: &Path, destination: &str, config: &Config) -> Result<Self> {
        check_source(source)?;

        let location = config.location(destination)?;
        location.validate(destination)?;

        let remote_path = remote_target(&location.path, source)?;
        debug!("Resolved {} -> {}:{}", source.display(), destination, remote_path);

        Ok(Self {
            source: source.to_path_buf(),
            destination: destination.to_string(),
            location: location.clone(),
            username: config.username.clone(),
            remote_path,
        })
    }

    /// Local file to send
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination name
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Resolved destination
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Full remote path of the uploaded file
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// SSH settings for reaching the destination
    pub fn ssh_config(&self) -> SshConfig {
        let defaults = SshConfig::default();
        SshConfig {
            host: self.location.host.clone(),
            port: self.location.port,
            username: self.username.clone(),
            host_key_policy: self.location.host_key_verification,
            known_hosts: self.location.known_hosts.clone().or(defaults.known_hosts),
        }
    }
}

fn check_source(source: &Path) -> Result<()> {
    match fs::metadata(source) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(GsendError::SourceNotAFile(source.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(GsendError::SourceNotFound(source.to_path_buf()))
        }
        Err(e) => Err(GsendError::SourceOpen {
            path: source.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsend_ssh::HostKeyPolicy;
    use tempfile::TempDir;

    fn config_with(name: &str, location: Location) -> Config {
        let mut config = Config {
            username: "deploy".to_string(),
            ..Default::default()
        };
        config.locations.insert(name.to_string(), location);
        config
    }

    fn remote_dir() -> Location {
        Location {
            path: "/remote/dir".to_string(),
            host: "h".to_string(),
            port: 2222,
            host_key_verification: HostKeyPolicy::KnownHosts,
            known_hosts: None,
        }
    }

    #[test]
    fn test_resolve_valid_request() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"hello").unwrap();

        let request = UploadRequest::resolve(&source, "D", &config_with("D", remote_dir())).unwrap();
        assert_eq!(request.source(), source.as_path());
        assert_eq!(request.destination(), "D");
        assert_eq!(request.remote_path(), "/remote/dir/a.txt");

        let ssh = request.ssh_config();
        assert_eq!(ssh.host, "h");
        assert_eq!(ssh.port, 2222);
        assert_eq!(ssh.username, "deploy");
        assert_eq!(ssh.host_key_policy, HostKeyPolicy::KnownHosts);
        assert_eq!(ssh.known_hosts, SshConfig::default().known_hosts);
    }

    #[test]
    fn test_location_known_hosts_overrides_default() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"hello").unwrap();

        let known_hosts = dir.path().join("known_hosts");
        let location = Location {
            known_hosts: Some(known_hosts.clone()),
            ..remote_dir()
        };

        let request = UploadRequest::resolve(&source, "D", &config_with("D", location)).unwrap();
        assert_eq!(request.ssh_config().known_hosts, Some(known_hosts));
    }

    #[test]
    fn test_missing_source_is_checked_first() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("missing.txt");

        // Unknown destination too: the source check must win.
        let err = UploadRequest::resolve(&source, "other", &config_with("D", remote_dir())).unwrap_err();
        assert!(matches!(err, GsendError::SourceNotFound(_)));
    }

    #[test]
    fn test_directory_source_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = UploadRequest::resolve(dir.path(), "D", &config_with("D", remote_dir())).unwrap_err();
        assert!(matches!(err, GsendError::SourceNotAFile(_)));
    }

    #[test]
    fn test_unknown_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"hello").unwrap();

        let err = UploadRequest::resolve(&source, "E", &config_with("D", remote_dir())).unwrap_err();
        assert!(matches!(err, GsendError::DestinationNotFound(ref name) if name == "E"));
    }

    #[test]
    fn test_zero_port_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"hello").unwrap();

        let location = Location { port: 0, ..remote_dir() };
        let err = UploadRequest::resolve(&source, "D", &config_with("D", location)).unwrap_err();
        assert!(matches!(err, GsendError::InvalidDestination { .. }));
    }
}
