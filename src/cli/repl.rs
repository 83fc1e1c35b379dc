//! Interactive command loop

use std::io::{BufRead, Write};

use log::{debug, error, warn};

use super::commands::{self, Request};
use crate::config::Config;
use crate::error::{Result, StrataError};
use crate::session::Session;

/// Run the prompt loop until `quit` or end of input.
///
/// Recoverable errors are printed and the loop continues. Anything else is
/// printed and then returned to the caller, as is any failure to read input
/// or write output.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    config: &Config,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut line = String::new();
    loop {
        write!(output, "{}", config.prompt)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input, leaving session");
            break;
        }

        let request = match commands::parse_line(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                commands::write_error(&mut output, &e)?;
                continue;
            }
        };

        match request {
            Request::Quit => break,
            Request::Help => commands::write_help(&mut output)?,
            Request::Run(command) => match session.execute(command) {
                Ok(outcome) => commands::write_outcome(&mut output, &outcome, config)?,
                Err(e) => {
                    commands::write_error(&mut output, &e)?;
                    if !e.is_recoverable() {
                        error!("Aborting session: {}", e);
                        return Err(e);
                    }
                    match e.recovery_suggestion() {
                        Some(hint) => warn!("[{}] {:?}: {}", e.error_code(), e, hint),
                        None => warn!("[{}] {:?}", e.error_code(), e),
                    }
                }
            },
        }
    }

    output.flush().map_err(StrataError::from)
}
