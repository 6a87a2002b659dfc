//! Command-line interface

use clap::{Parser, ValueEnum};
use ddns_core::Configuration;
use ddns_ip_http::DEFAULT_IP_SERVICE_URL;
use ddns_provider_digitalocean::{DIGITALOCEAN_API_BASE, DigitalOceanOptions};
use std::time::Duration;
use tracing::Level;

/// Point DigitalOcean A records at this machine's public IP address
#[derive(Parser, Debug)]
#[command(name = "ddns-updater", version, about, long_about = None)]
pub struct Cli {
    /// DigitalOcean API key
    pub api_key: String,

    /// Domain the records belong to, e.g. "example.com"
    pub domain: String,

    /// Comma-separated record names, e.g. "remote, pc"
    pub records: String,

    /// Comma-separated values for the records; the last one is repeated
    /// for any remaining records. Defaults to the public IP address
    #[arg(long)]
    pub record_values: Option<String>,

    /// IP-echo service answering with {"ip": "<address>"}
    #[arg(long, default_value = DEFAULT_IP_SERVICE_URL)]
    pub ip_service: String,

    /// Log the updates that would be made without sending them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl Cli {
    /// Validate the positional arguments and record values
    pub fn configuration(&self) -> ddns_core::Result<Configuration> {
        Configuration::parse(
            &self.api_key,
            &self.domain,
            &self.records,
            self.record_values.as_deref(),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn provider_options(&self) -> DigitalOceanOptions {
        DigitalOceanOptions {
            base_url: DIGITALOCEAN_API_BASE.to_string(),
            timeout: self.timeout(),
            dry_run: self.dry_run,
        }
    }
}
