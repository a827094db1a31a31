//! Authentication method planning
//!
//! An [`AuthPlan`] is the ordered list of methods offered to the server. The
//! agent comes first when one is reachable, then the password when one was
//! entered. Methods are tried in order until the server accepts one.

use ssh2::Session;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use zeroize::Zeroizing;

use crate::TransportError;

/// Environment variable naming the SSH agent socket
pub const AGENT_SOCKET_ENV: &str = "SSH_AUTH_SOCK";

/// A single authentication method
#[derive(Clone)]
pub enum AuthMethod {
    /// Public key signing through the SSH agent
    Agent {
        /// Socket the agent was found on
        socket: PathBuf,
    },
    /// Password authentication
    Password(Zeroizing<String>),
}

impl AuthMethod {
    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Agent { .. } => "agent",
            AuthMethod::Password(_) => "password",
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Agent { socket } => f.debug_struct("Agent").field("socket", socket).finish(),
            AuthMethod::Password(_) => f.write_str("Password(<redacted>)"),
        }
    }
}

/// Ordered set of authentication methods
#[derive(Debug, Clone, Default)]
pub struct AuthPlan {
    methods: Vec<AuthMethod>,
}

impl AuthPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from an optional agent socket and an optional password
    ///
    /// The agent, when present, is offered first.
    pub fn from_sources(agent: Option<PathBuf>, password: Option<Zeroizing<String>>) -> Self {
        let mut plan = Self::new();
        if let Some(socket) = agent {
            plan = plan.with_agent(socket);
        }
        match password {
            Some(password) => plan.with_password(password),
            None => plan,
        }
    }

    /// Offer agent authentication through the given socket
    pub fn with_agent(mut self, socket: PathBuf) -> Self {
        self.methods.push(AuthMethod::Agent { socket });
        self
    }

    /// Offer password authentication. Empty passwords are not offered.
    pub fn with_password(mut self, password: Zeroizing<String>) -> Self {
        if !password.is_empty() {
            self.methods.push(AuthMethod::Password(password));
        }
        self
    }

    /// Methods in the order they will be tried
    pub fn methods(&self) -> &[AuthMethod] {
        &self.methods
    }

    /// Whether no method is available
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Try each method against the handshaken session until one succeeds
    pub(crate) fn authenticate(&self, session: &Session, username: &str) -> Result<(), TransportError> {
        if self.is_empty() {
            return Err(TransportError::Authentication(
                "no authentication methods available".to_string(),
            ));
        }

        let mut failures = Vec::new();
        for method in &self.methods {
            debug!("Trying {} authentication for {}", method.name(), username);

            let attempt = match method {
                AuthMethod::Agent { socket } => authenticate_with_agent(session, username, socket),
                AuthMethod::Password(password) => session
                    .userauth_password(username, password)
                    .map_err(|e| e.to_string()),
            };

            match attempt {
                Ok(()) if session.authenticated() => {
                    debug!("Authenticated with {}", method.name());
                    return Ok(());
                }
                Ok(()) => failures.push(format!("{}: rejected", method.name())),
                Err(e) => failures.push(format!("{}: {}", method.name(), e)),
            }
        }

        Err(TransportError::Authentication(failures.join("; ")))
    }
}

/// Open the agent listening on `socket`
fn connect_agent(session: &Session, socket: &Path) -> Result<ssh2::Agent, String> {
    let mut agent = session.agent().map_err(|e| e.to_string())?;
    agent
        .set_identity_path(socket)
        .map_err(|e| format!("{}: {}", socket.display(), e))?;
    agent
        .connect()
        .map_err(|e| format!("{}: {}", socket.display(), e))?;
    Ok(agent)
}

fn authenticate_with_agent(session: &Session, username: &str, socket: &Path) -> Result<(), String> {
    let mut agent = connect_agent(session, socket)?;
    agent.list_identities().map_err(|e| e.to_string())?;

    let identities = agent.identities().map_err(|e| e.to_string())?;
    if identities.is_empty() {
        let _ = agent.disconnect();
        return Err("agent holds no identities".to_string());
    }

    for identity in &identities {
        match agent.userauth(username, identity) {
            Ok(()) => {
                let _ = agent.disconnect();
                return Ok(());
            }
            Err(e) => debug!("Agent identity {:?} rejected: {}", identity.comment(), e),
        }
    }

    let _ = agent.disconnect();
    Err(format!("none of {} agent identities accepted", identities.len()))
}

/// Locate a reachable agent socket through [`AGENT_SOCKET_ENV`]
pub fn agent_socket_from_env() -> Option<PathBuf> {
    let socket = std::env::var_os(AGENT_SOCKET_ENV)?;
    if socket.is_empty() {
        return None;
    }

    let socket = PathBuf::from(socket);
    if agent_reachable(&socket) {
        Some(socket)
    } else {
        debug!("Agent socket {} is not reachable", socket.display());
        None
    }
}

#[cfg(unix)]
fn agent_reachable(socket: &Path) -> bool {
    std::os::unix::net::UnixStream::connect(socket).is_ok()
}

#[cfg(not(unix))]
fn agent_reachable(_socket: &Path) -> bool {
    true
}
