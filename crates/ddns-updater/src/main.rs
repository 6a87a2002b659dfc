// # ddns-updater
//
// One-shot command that points A records in a DigitalOcean domain at the
// machine's public IP address, or at explicitly supplied values.
//
// The binary only wires things together:
// 1. Parse the command line and validate it into a `Configuration`
// 2. Initialize tracing and a single-threaded tokio runtime
// 3. Hand the configuration to `ddns_core::Updater`
// 4. Map the outcome to a process exit code
//
// ## Example
//
// ```bash
// ddns-updater "$DO_TOKEN" example.com "remote, pc"
// ddns-updater "$DO_TOKEN" example.com "remote, pc" --record-values 10.1.0.1
// ```

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use ddns_core::{RunError, UpdateReport, Updater};
use ddns_ip_http::HttpIpSource;
use ddns_provider_digitalocean::DigitalOceanFactory;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the ways a run can end
///
/// Skipped records do not affect the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdaterExitCode {
    /// Every stage completed
    Success = 0,
    /// Tracing, runtime or HTTP client could not be initialized
    StartupError = 1,
    /// Arguments failed validation (clap usage errors also exit with 2)
    InvalidArguments = 2,
    /// The public IP address could not be resolved
    PublicIpError = 3,
    /// The API client could not be built with the api-key
    ClientError = 4,
    /// The domain's records could not be listed
    ListRecordsError = 5,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&RunError> for UpdaterExitCode {
    fn from(err: &RunError) -> Self {
        match err {
            RunError::PublicIp(_) => UpdaterExitCode::PublicIpError,
            RunError::ClientConstruction { .. } => UpdaterExitCode::ClientError,
            RunError::ListRecords { .. } => UpdaterExitCode::ListRecordsError,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_level.into()) {
        eprintln!("{:#}", e);
        return UpdaterExitCode::StartupError.into();
    }

    let config = match cli.configuration() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return UpdaterExitCode::InvalidArguments.into();
        }
    };

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{:#}", e);
            return UpdaterExitCode::StartupError.into();
        }
    };

    let ip_source = match HttpIpSource::with_timeout(cli.ip_service.clone(), cli.timeout()) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            return UpdaterExitCode::StartupError.into();
        }
    };
    let factory = DigitalOceanFactory::new(cli.provider_options());
    let updater = Updater::new(Box::new(ip_source), Box::new(factory));

    let result = runtime.block_on(updater.run(config));
    finish(result).into()
}

/// Log a fatal stage and pick the exit code
///
/// Skipped records were already reported as they happened.
fn finish(result: std::result::Result<UpdateReport, RunError>) -> UpdaterExitCode {
    match result {
        Ok(report) => {
            debug!(
                "{} record(s) updated, {} skipped",
                report.updated_count(),
                report.skipped_count()
            );
            UpdaterExitCode::Success
        }
        Err(e) => {
            error!("{}", e);
            UpdaterExitCode::from(&e)
        }
    }
}

/// Install the global fmt subscriber
fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Network calls are strictly sequential, so one thread is enough
fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
}
