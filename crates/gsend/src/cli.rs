//! Command line parsing

use crate::config::{resolve_config_path, CONFIG_ENV};
use crate::session::UploadArgs;
use crate::{GsendError, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Upload a file to a named SFTP destination
#[derive(Debug, Parser)]
#[command(name = "gsend", version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(short, long, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Local file to upload
    pub source: PathBuf,

    /// Destination name from the config
    pub destination: String,
}

/// Outcome of parsing the command line
#[derive(Debug)]
pub enum Invocation {
    /// Perform an upload
    Run(Cli),
    /// Print help or version text and exit successfully
    Info(String),
}

impl Cli {
    /// Parse arguments, turning usage errors into [`GsendError::InvalidUsage`]
    pub fn try_parse_args<I, T>(args: I) -> Result<Invocation>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(Invocation::Run(cli)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Ok(Invocation::Info(e.to_string()))
            }
            Err(e) => Err(GsendError::InvalidUsage {
                usage: usage(),
                reason: error_reason(&e.to_string()),
            }),
        }
    }

    /// Resolve the config location and build the upload arguments
    pub fn upload_args(&self) -> Result<UploadArgs> {
        Ok(UploadArgs {
            source: self.source.clone(),
            destination: self.destination.clone(),
            config_path: resolve_config_path(self.config.clone())?,
        })
    }
}

/// Usage text printed on invalid invocations
pub fn usage() -> String {
    format!("USAGE:\n{}", Cli::command().render_usage())
}

/// Flatten the leading paragraph of a clap error onto one line.
///
/// The paragraph carries the error and any argument names it lists. The
/// usage and help hint that follow are dropped.
fn error_reason(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start_matches("error: ")
        .to_string()
}
