//! Configuration file handling
//!
//! The configuration lives at `<config dir>/gsend/gsend.yaml` and names the
//! SSH user plus every destination the tool can upload to:
//!
//! ```yaml
//! username: deploy
//! locations:
//!   web:
//!     path: /srv/www
//!     host: web.example.com
//!     port: 22
//!     host_key_verification: known_hosts
//!     known_hosts: /etc/gsend/known_hosts
//! ```

use crate::{GsendError, Result};
use gsend_ssh::HostKeyPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the directory holding the config under the user config directory
pub const CONFIG_DIR_NAME: &str = "gsend";

/// File name of the config
pub const CONFIG_FILE_NAME: &str = "gsend.yaml";

/// Environment variable overriding the config location
pub const CONFIG_ENV: &str = "GSEND_CONFIG";

/// Persistent gsend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// User to authenticate as on every destination
    #[serde(default)]
    pub username: String,
    /// Named destinations
    #[serde(default)]
    pub locations: BTreeMap<String, Location>,
}

/// A named remote endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Remote directory uploads are placed in
    #[serde(default)]
    pub path: String,
    /// Remote hostname or IP
    #[serde(default)]
    pub host: String,
    /// Remote SSH port
    #[serde(default)]
    pub port: u16,
    /// How the server's host key is verified
    #[serde(default)]
    pub host_key_verification: HostKeyPolicy,
    /// known_hosts file to check against instead of `~/.ssh/known_hosts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_hosts: Option<PathBuf>,
}

impl Location {
    /// Reject entries that cannot be dialed
    pub fn validate(&self, name: &str) -> Result<()> {
        let invalid = |reason: &str| GsendError::InvalidDestination {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if self.host.trim().is_empty() {
            return Err(invalid("host is empty"));
        }
        if self.port == 0 {
            return Err(invalid("port is zero"));
        }
        Ok(())
    }
}

impl Config {
    /// Load the config at `path`, writing a default one if it does not exist.
    ///
    /// A missing file is reported as [`GsendError::ConfigNotFound`] once the
    /// default has been written, so the operator can fill it in and retry.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Self::write_default(path).map_err(|source| GsendError::ConfigWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("wrote default config: {}", path.display());
                return Err(GsendError::ConfigNotFound { path: path.to_path_buf() });
            }
            Err(e) => {
                return Err(GsendError::ConfigParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        info!("found config: {}", path.display());

        let config = Self::parse(&text).map_err(|e| GsendError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!("config parsed");
        Ok(config)
    }

    /// Parse YAML text. An empty document yields the default config.
    pub fn parse(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Write an empty config to `path`, creating parent directories
    pub fn write_default(path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("writing new config: {}", path.display());

        let text = serde_yaml::to_string(&Self::default())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, text)
    }

    /// Look up a destination by name
    pub fn location(&self, name: &str) -> Result<&Location> {
        self.locations
            .get(name)
            .ok_or_else(|| GsendError::DestinationNotFound(name.to_string()))
    }
}

/// Platform default location of the config file
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or(GsendError::ConfigDirUnavailable)?;
    Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Use the explicit path when given, otherwise the platform default
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}
