//! `cb` binary entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use campaign_builder_cli::{commands, Cli};
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(
            "campaign_builder=debug,campaign_builder_cli=debug,campaign_builder_config=debug",
        )
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let result = {
        let mut out = std::io::stdout().lock();
        commands::run(&cli, &mut out).and_then(|()| out.flush().map_err(Into::into))
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(exit_code);
}
