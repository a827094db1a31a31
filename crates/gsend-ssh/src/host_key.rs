//! Host identity verification

use serde::{Deserialize, Serialize};
use ssh2::{CheckResult, KnownHostFileKind, Session};
use std::path::Path;
use tracing::{debug, warn};

use crate::TransportError;

/// How the server's host key is verified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyPolicy {
    /// Accept any host key. Insecure, a warning is logged on every connection.
    #[default]
    Disabled,
    /// Require a matching entry in the OpenSSH known_hosts file
    KnownHosts,
}

impl HostKeyPolicy {
    /// Check the key presented during the handshake
    pub(crate) fn verify(
        &self,
        session: &Session,
        host: &str,
        port: u16,
        known_hosts: Option<&Path>,
    ) -> Result<(), TransportError> {
        let addr = format!("{}:{}", host, port);

        match self {
            HostKeyPolicy::Disabled => {
                warn!("Host key verification is disabled for [{}]", addr);
                Ok(())
            }
            HostKeyPolicy::KnownHosts => {
                let path = known_hosts.ok_or_else(|| TransportError::HostKey {
                    addr: addr.clone(),
                    message: "no known_hosts file location".to_string(),
                })?;
                check_known_hosts(session, host, port, path)
                    .map_err(|message| TransportError::HostKey { addr, message })
            }
        }
    }
}

fn check_known_hosts(session: &Session, host: &str, port: u16, path: &Path) -> Result<(), String> {
    let (key, _) = session
        .host_key()
        .ok_or_else(|| "server presented no host key".to_string())?;

    let mut known_hosts = session.known_hosts().map_err(|e| e.to_string())?;
    known_hosts
        .read_file(path, KnownHostFileKind::OpenSSH)
        .map_err(|e| format!("unable to read {}: {}", path.display(), e))?;

    match known_hosts.check_port(host, port, key) {
        CheckResult::Match => {
            debug!("Host key for {}:{} matches {}", host, port, path.display());
            Ok(())
        }
        CheckResult::NotFound => Err(format!("no entry in {}", path.display())),
        CheckResult::Mismatch => Err(format!("key does not match entry in {}", path.display())),
        CheckResult::Failure => Err("known_hosts check failed".to_string()),
    }
}
