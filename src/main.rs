//! hapctl - HAProxy runtime control client
//!
//! This is the main entry point for the hapctl CLI.

use anyhow::Result;
use clap::Parser;
use hapctl::cli::Cli;
use hapctl::client::RuntimeClient;
use hapctl::transport::UnixSocket;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity);

    let transport =
        UnixSocket::new(&cli.socket).with_timeout(Duration::from_secs(cli.io_timeout));
    let mut client = RuntimeClient::new(transport);

    match client.apply(&cli.to_request()) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(err) => {
            eprintln!("hapctl: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
