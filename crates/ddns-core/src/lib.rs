// # ddns-core
//
// Core library for the DigitalOcean A-record updater.
//
// ## Architecture Overview
//
// - **Configuration**: Validated command-line input (api key, domain, records, values)
// - **IpSource**: Trait for resolving the caller's public IP address
// - **DnsProvider**: Trait for listing and updating domain records via a provider API
// - **Updater**: Runs one pass: resolve targets, list records, match by name, update
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The update flow knows nothing about HTTP
// 2. **Explicit Failure Policy**: Fatal stages return `RunError`, per-record
//    failures are reported and skipped
// 3. **Library-First**: The binary is a thin layer over this crate

pub mod traits;
pub mod updater;
pub mod records;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, DnsProviderFactory};
pub use updater::{Updater, UpdateReport, RecordOutcome, RecordStatus, RunError};
pub use records::{DomainRecord, RecordId, find_a_record};
pub use config::Configuration;
pub use error::{Error, Result};
