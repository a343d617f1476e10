//! Waypoint server entry point.
//!
//! ```text
//! waypoint [--transport stdio|http] [--catalog weather|flights|places|all]
//! ```
//!
//! Logs go to standard error; with the stdio transport standard output
//! carries protocol messages only.

use clap::Parser;
use std::process::ExitCode;
use waypoint::config::{ServerArgs, ServerConfig};
use waypoint::{server, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let args = ServerArgs::parse();
    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            return ExitCode::from(2);
        }
    };

    if let Err(err) = telemetry::init(&config.log) {
        report(&err);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        transport = %config.transport,
        catalog = %config.catalog,
        "starting waypoint"
    );
    match server::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "tracing is not installed yet")]
fn report(err: &dyn std::error::Error) {
    eprintln!("waypoint: {err}");
}
