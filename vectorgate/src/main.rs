#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! The `vectorgate` command.

use clap::Parser;
use std::process::ExitCode;
use vectorgate::cli::{exit_status, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = vectorgate::logging::init_tracing() {
        eprintln!("warning: logging unavailable: {error}");
    }

    let result = cli.run();
    match &result {
        Ok(run) => run.print(),
        Err(error) => tracing::error!("{error:#}"),
    }
    ExitCode::from(exit_status(&result))
}
