//! Core traits for the updater
//!
//! This module defines the seams between the update flow and the outside world.
//!
//! - [`IpSource`]: Resolve the caller's public IP address
//! - [`DnsProvider`]: List and update domain records via a provider API
//! - [`DnsProviderFactory`]: Build a provider from an API key

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsProviderFactory};
