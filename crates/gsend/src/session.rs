//! Upload session orchestration
//!
//! One run walks a fixed sequence: load the config, validate the request,
//! read the password, connect and authenticate, then stream the file. The
//! first failing step ends the run.

use crate::config::Config;
use crate::context::UploadRequest;
use crate::credentials::PasswordPrompt;
use crate::transfer;
use crate::Result;
use gsend_ssh::auth::agent_socket_from_env;
use gsend_ssh::{AuthPlan, Transport};
use std::path::PathBuf;
use tracing::{debug, info};

/// What to upload and where the config lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadArgs {
    /// Local file to send
    pub source: PathBuf,
    /// Destination name from the config
    pub destination: String,
    /// Config file location
    pub config_path: PathBuf,
}

/// A single upload run over a transport
pub struct Session<T, P> {
    /// Transport used to reach the destination
    transport: T,
    /// Password source
    prompt: P,
    /// Reachable SSH agent, if any
    agent_socket: Option<PathBuf>,
}

impl<T: Transport, P: PasswordPrompt> Session<T, P> {
    /// Create a session, picking up the SSH agent from the environment
    pub fn new(transport: T, prompt: P) -> Self {
        Self {
            transport,
            prompt,
            agent_socket: agent_socket_from_env(),
        }
    }

    /// Override the agent socket discovered from the environment
    pub fn with_agent_socket(mut self, socket: Option<PathBuf>) -> Self {
        self.agent_socket = socket;
        self
    }

    /// Run every step and return the number of bytes written
    pub fn run(&mut self, args: &UploadArgs) -> Result<u64> {
        let request = self.prepare(args)?;
        self.send(&request)
    }

    /// Load the config and validate the request. No network access.
    pub fn prepare(&self, args: &UploadArgs) -> Result<UploadRequest> {
        let config = Config::load_or_init(&args.config_path)?;
        UploadRequest::resolve(&args.source, &args.destination, &config)
    }

    /// Prompt for the password, connect and stream the file
    pub fn send(&mut self, request: &UploadRequest) -> Result<u64> {
        let password = self.prompt.read_password()?;

        let plan = AuthPlan::from_sources(self.agent_socket.clone(), Some(password));
        debug!("Authentication plan: {:?}", plan);

        info!("connecting");
        let mut remote = self.transport.connect(&request.ssh_config(), &plan)?;
        let info = remote.connection_info();
        info!("connected to {}@{}:{}", info.username, info.host, info.port);

        let written = transfer::upload(remote.as_mut(), request)?;
        info!("wrote {} bytes", written);
        Ok(written)
    }
}
