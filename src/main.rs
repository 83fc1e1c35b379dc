//! Strata CLI - Layered BMP Compositor
//!
//! Interactive front end: `strata <WIDTH> <HEIGHT>` opens a canvas and reads
//! commands from standard input.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use strata::cli::{commands, repl, Cli};
use strata::config::Config;
use strata::session::Session;
use strata::StrataError;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => return fail(&StrataError::InvalidArgumentCount),
    };

    let canvas = match cli.canvas() {
        Ok(canvas) => canvas,
        Err(e) => return fail(&e),
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = if cli.verbose {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    info!("Strata v{} on a {} canvas", env!("CARGO_PKG_VERSION"), canvas);

    let mut stdout = io::stdout();
    if config.welcome {
        if let Err(e) = commands::write_welcome(&mut stdout, &cli.width, &cli.height) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut session = Session::new(canvas);
    let stdin = io::stdin();
    match repl::run(&mut session, &config, stdin.lock(), stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load_or_default(cli.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    Ok(config)
}

/// Report a startup error on stdout and map it to its exit status
fn fail(err: &StrataError) -> ExitCode {
    let _ = commands::write_error(&mut io::stdout(), err);
    ExitCode::from(err.exit_code() as u8)
}
