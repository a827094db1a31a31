//! gsend binary
//!
//! `gsend <SOURCE> <DESTINATION>` uploads SOURCE to the named destination.

use gsend::ssh::Ssh2Transport;
use gsend::{Cli, GsendError, Invocation, Session, TerminalPrompt};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Info(text)) => {
            print!("{}", text);
            return;
        }
        Err(e) => {
            init_tracing(false);
            if let GsendError::InvalidUsage { usage, .. } = &e {
                println!("{}", usage);
            }
            error!("{}", e);
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout is reserved for usage text and the password prompt
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> gsend::Result<()> {
    let args = cli.upload_args()?;
    info!("cfg file {}", args.config_path.display());

    let mut session = Session::new(Ssh2Transport::new(), TerminalPrompt);
    session.run(&args)?;
    Ok(())
}
