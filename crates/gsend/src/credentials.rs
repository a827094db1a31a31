//! Interactive credential acquisition

use crate::{GsendError, Result};
use std::io::{self, Write};
use tracing::debug;
use zeroize::Zeroizing;

/// Text shown before reading the password
pub const PASSWORD_PROMPT: &str = "enter password";

/// Source of the SSH password
pub trait PasswordPrompt {
    /// Obtain the password. It is kept in memory only.
    fn read_password(&mut self) -> Result<Zeroizing<String>>;
}

/// Prompts on stdout and reads from the controlling terminal with echo off
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", PASSWORD_PROMPT).map_err(GsendError::TerminalRead)?;
        stdout.flush().map_err(GsendError::TerminalRead)?;
        drop(stdout);

        let password = rpassword::read_password().map_err(GsendError::TerminalRead)?;
        debug!("got password");
        Ok(Zeroizing::new(password))
    }
}

/// Supplies a password that is already known, for scripted use
pub struct FixedPassword(Zeroizing<String>);

impl FixedPassword {
    /// Wrap a known password
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

impl PasswordPrompt for FixedPassword {
    fn read_password(&mut self) -> Result<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}
