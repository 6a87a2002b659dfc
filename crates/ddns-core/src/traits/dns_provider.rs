// # DNS Provider Trait
//
// Defines the interface for reading and updating domain records via a
// provider's REST API.
//
// ## Implementations
//
// - DigitalOcean: `ddns-provider-digitalocean` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_domain_records("example.com").await?;
//     if let Some(home) = ddns_core::find_a_record(&records, "home") {
//         provider.update_domain_record("example.com", home.id, "203.0.113.5").await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::records::{DomainRecord, RecordId};

/// Trait for DNS provider implementations
///
/// Implementations execute exactly one logical API operation per call and
/// return errors to the caller. Deciding whether an error aborts the run or
/// skips a record is the updater's job.
///
/// # Security
///
/// Implementations hold the API key and must never log it or expose it
/// through `Debug`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in a zone
    ///
    /// # Parameters
    ///
    /// - `domain`: The zone name (e.g., "example.com")
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DomainRecord>)`: All records, in the provider's listing order
    /// - `Err(Error)`: Bad credentials, unknown domain, or transport failure
    async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>, crate::Error>;

    /// Set the data of a single record
    ///
    /// # Parameters
    ///
    /// - `domain`: The zone name
    /// - `record_id`: The record ID from [`DnsProvider::list_domain_records`]
    /// - `data`: The new record value
    ///
    /// # Returns
    ///
    /// - `Ok(DomainRecord)`: The record as stored by the provider after the update
    /// - `Err(Error)`: If the update failed
    async fn update_domain_record(
        &self,
        domain: &str,
        record_id: RecordId,
        data: &str,
    ) -> Result<DomainRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from an API key
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance
    ///
    /// # Parameters
    ///
    /// - `api_key`: The provider credential
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object, or an error if the client cannot be
    /// built with this key
    fn create(&self, api_key: &str) -> Result<Box<dyn DnsProvider>, crate::Error>;

    /// Get the name of the providers this factory builds
    fn provider_name(&self) -> &'static str;
}
