//! The update run
//!
//! The [`Updater`] drives one pass over the configured records:
//!
//! ```text
//! Configuration ──► IpSource (only if no record values) ──► DnsProviderFactory
//!                                                                  │
//!                          ┌───────────────────────────────────────┘
//!                          ▼
//!                  list_domain_records ──► per record: find A record ──► update
//! ```
//!
//! ## Failure policy
//!
//! - Public IP lookup, provider construction and record listing are fatal:
//!   [`Updater::run`] returns a [`RunError`] naming the stage, before any
//!   record has been touched.
//! - A missing record or a failed update only skips that record. The outcome
//!   is recorded in the [`UpdateReport`] and the run carries on.

use crate::config::Configuration;
use crate::error::Error;
use crate::records::{RecordId, find_a_record};
use crate::traits::{DnsProviderFactory, IpSource};
use tracing::{debug, info, warn};

/// A failure that ends the run
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    /// The public IP address could not be resolved
    #[error("Cannot determine public IP address: {0}")]
    PublicIp(#[source] Error),

    /// The provider client could not be built with the API key
    #[error("Cannot connect to {provider} API with specified api-key. Exiting... ({source})")]
    ClientConstruction {
        /// Provider name
        provider: &'static str,
        /// Underlying error
        #[source]
        source: Error,
    },

    /// The zone's records could not be listed
    #[error("Cannot retrieve {domain}'s domain records. Exiting... ({source})")]
    ListRecords {
        /// The zone that was being listed
        domain: String,
        /// Underlying error
        #[source]
        source: Error,
    },
}

/// What happened to one configured record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// The record was updated
    Updated {
        /// ID of the record that was changed
        record_id: RecordId,
    },

    /// The zone has no A record with this name
    NotFound,

    /// The provider rejected or failed the update
    Failed {
        /// ID of the record the update was sent for
        record_id: RecordId,
        /// Error message
        reason: String,
    },
}

/// Outcome for one configured record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Record name as given on the command line
    pub record: String,
    /// Value the record was meant to point to
    pub target: String,
    /// Result of the attempt
    pub status: RecordStatus,
}

/// Per-record outcomes of a completed run, in record order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl UpdateReport {
    /// Number of records that were updated
    pub fn updated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RecordStatus::Updated { .. }))
            .count()
    }

    /// Number of records that were skipped, for any reason
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.updated_count()
    }
}

/// Runs the update flow against an IP source and a provider factory
pub struct Updater {
    /// Resolves the public IP when no record values are given
    ip_source: Box<dyn IpSource>,

    /// Builds the provider client from the configured API key
    provider_factory: Box<dyn DnsProviderFactory>,
}

impl Updater {
    /// Create a new updater
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider_factory`: Factory for the DNS provider client
    pub fn new(ip_source: Box<dyn IpSource>, provider_factory: Box<dyn DnsProviderFactory>) -> Self {
        Self {
            ip_source,
            provider_factory,
        }
    }

    /// Execute one update run
    ///
    /// Every network call is awaited before the next one is issued.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateReport)`: The run completed; individual records may still
    ///   have been skipped
    /// - `Err(RunError)`: A fatal stage failed and no record was updated
    pub async fn run(&self, config: Configuration) -> Result<UpdateReport, RunError> {
        let config = if config.has_record_values() {
            config
        } else {
            let public_ip = self.ip_source.current().await.map_err(RunError::PublicIp)?;
            info!("Public IP address: {}", public_ip);
            config.with_uniform_value(public_ip.to_string())
        };

        let provider = self
            .provider_factory
            .create(config.api_key())
            .map_err(|source| RunError::ClientConstruction {
                provider: self.provider_factory.provider_name(),
                source,
            })?;

        let domain = config.domain();
        let domain_records = provider
            .list_domain_records(domain)
            .await
            .map_err(|source| RunError::ListRecords {
                domain: domain.to_string(),
                source,
            })?;
        debug!("Fetched {} record(s) for {}", domain_records.len(), domain);

        let mut report = UpdateReport::default();

        for (record, target) in config.targets() {
            info!("Updating {} in {} to point to {}", record, domain, target);

            let status = match find_a_record(&domain_records, record) {
                None => {
                    warn!(
                        "Cannot find A record {} in {}, skipping this record...",
                        record, domain
                    );
                    RecordStatus::NotFound
                }
                Some(existing) => {
                    debug!(
                        "Matched record id {} (currently {})",
                        existing.id, existing.data
                    );

                    match provider
                        .update_domain_record(domain, existing.id, target)
                        .await
                    {
                        Ok(_) => {
                            info!("done.");
                            RecordStatus::Updated {
                                record_id: existing.id,
                            }
                        }
                        Err(e) => {
                            warn!(
                                "Cannot update {} in {}, skipping this record... ({})",
                                record, domain, e
                            );
                            RecordStatus::Failed {
                                record_id: existing.id,
                                reason: e.to_string(),
                            }
                        }
                    }
                }
            };

            report.outcomes.push(RecordOutcome {
                record: record.to_string(),
                target: target.to_string(),
                status,
            });
        }

        Ok(report)
    }
}
