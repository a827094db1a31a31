//! Shared helpers for gsend integration tests
//!
//! Live tests talk to a real SSH server described by environment variables:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `GSEND_TEST_HOST` | server hostname (required) |
//! | `GSEND_TEST_PORT` | server port, default `2222` |
//! | `GSEND_TEST_USER` | login user (required) |
//! | `GSEND_TEST_PASSWORD` | password for the user (required) |
//! | `GSEND_TEST_REMOTE_DIR` | writable remote directory, default `/tmp` |

#![allow(dead_code)]

use anyhow::{Context, Result};
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use ssh2::Session;
use std::fs;
use std::io::Read;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Live SSH server used by the end-to-end tests
#[derive(Debug, Clone)]
pub struct TestServer {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub remote_dir: String,
}

impl TestServer {
    /// Read the server description from the environment
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).with_context(|| format!("{} is not set", name));

        Ok(Self {
            host: var("GSEND_TEST_HOST")?,
            port: std::env::var("GSEND_TEST_PORT")
                .unwrap_or_else(|_| "2222".to_string())
                .parse()
                .context("GSEND_TEST_PORT is not a port number")?,
            user: var("GSEND_TEST_USER")?,
            password: var("GSEND_TEST_PASSWORD")?,
            remote_dir: std::env::var("GSEND_TEST_REMOTE_DIR").unwrap_or_else(|_| "/tmp".to_string()),
        })
    }

    /// Config text naming this server as destination `name`
    pub fn config_yaml(&self, name: &str) -> String {
        format!(
            "username: {}\nlocations:\n  {}:\n    path: {}\n    host: {}\n    port: {}\n",
            self.user, name, self.remote_dir, self.host, self.port
        )
    }

    /// Open an independent SFTP view of the server for assertions
    pub fn sftp(&self) -> Result<ssh2::Sftp> {
        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .context("Failed to connect to test server")?;
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake().context("SSH handshake with test server failed")?;
        session
            .userauth_password(&self.user, &self.password)
            .context("Test server rejected the test credentials")?;
        Ok(session.sftp()?)
    }

    /// Read a remote file back, or `None` if it does not exist
    pub fn read_remote(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let sftp = self.sftp()?;
        let mut file = match sftp.open(Path::new(path)) {
            Ok(file) => file,
            Err(_) => return Ok(None),
        };
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(Some(contents))
    }

    /// Remove a remote file, ignoring absence
    pub fn remove_remote(&self, path: &str) -> Result<()> {
        let _ = self.sftp()?.unlink(Path::new(path));
        Ok(())
    }
}

/// Local workspace with a config file and a source file
pub struct Workspace {
    pub dir: TempDir,
    pub config_path: PathBuf,
    pub source: PathBuf,
}

impl Workspace {
    /// Create a workspace whose config holds `config` and whose source holds `contents`
    pub fn new(config: &str, file_name: &str, contents: &[u8]) -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temporary directory")?;
        let config_path = dir.path().join("gsend").join("gsend.yaml");
        fs::create_dir_all(config_path.parent().unwrap_or(dir.path()))?;
        fs::write(&config_path, config).context("Failed to write config")?;

        let source = dir.path().join(file_name);
        fs::write(&source, contents).context("Failed to write source file")?;

        Ok(Self { dir, config_path, source })
    }

    /// Replace the config file contents
    pub fn write_config(&self, config: &str) -> Result<()> {
        fs::write(&self.config_path, config).context("Failed to write config")
    }

    /// Workspace without any config file
    pub fn without_config(file_name: &str, contents: &[u8]) -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temporary directory")?;
        let config_path = dir.path().join("gsend").join("gsend.yaml");
        let source = dir.path().join(file_name);
        fs::write(&source, contents).context("Failed to write source file")?;

        Ok(Self { dir, config_path, source })
    }
}

/// Random bytes of the given length
pub fn random_payload(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

/// Random file name unlikely to collide on a shared server
pub fn unique_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("{}-{}.bin", prefix, suffix)
}
