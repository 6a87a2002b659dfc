// # DigitalOcean DNS Provider
//
// This crate provides a DigitalOcean DNS provider implementation for the updater.
//
// ## Behaviour
//
// - One logical API operation per trait call; errors are returned, never retried
// - HTTP timeout configured (30 seconds by default)
// - Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - Record listing follows pagination until the last page
// - Dry-run mode for safe testing
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider construction fails fast if the token is empty or cannot be sent
//   in an HTTP header
//
// ## API Reference
//
// - DigitalOcean API v2: https://docs.digitalocean.com/reference/api/
// - List Domain Records: GET `/v2/domains/:domain/records`
// - Retrieve Domain Record: GET `/v2/domains/:domain/records/:record_id`
// - Update Domain Record: PUT `/v2/domains/:domain/records/:record_id`

use async_trait::async_trait;
use ddns_core::traits::{DnsProvider, DnsProviderFactory};
use ddns_core::{DomainRecord, Error, RecordId, Result};
use reqwest::Url;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// DigitalOcean API base URL
pub const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size requested when listing records (the API maximum)
const RECORDS_PER_PAGE: u32 = 200;

/// Name used in logs and error messages
const PROVIDER_NAME: &str = "DigitalOcean";

/// Connection options shared by every provider a factory builds
#[derive(Debug, Clone)]
pub struct DigitalOceanOptions {
    /// API base URL, without a trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Dry-run mode: perform GET requests but skip PUT updates
    pub dry_run: bool,
}

impl Default for DigitalOceanOptions {
    fn default() -> Self {
        Self {
            base_url: DIGITALOCEAN_API_BASE.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            dry_run: false,
        }
    }
}

/// One page of `GET /domains/:domain/records`
#[derive(Debug, Deserialize)]
struct RecordsPage {
    domain_records: Vec<DomainRecord>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

/// Body of single-record responses
#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    domain_record: DomainRecord,
}

/// Error body returned by the API, e.g. `{"id": "not_found", "message": "..."}`
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

/// DigitalOcean DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (record listing, record lookup)
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct DigitalOceanProvider {
    /// DigitalOcean personal access token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL
    base_url: Url,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DigitalOceanProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url.as_str())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DigitalOceanProvider {
    /// Create a new DigitalOcean provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Personal access token with write access to domains
    /// - `options`: Base URL, timeout and dry-run mode
    ///
    /// # Returns
    ///
    /// - `Ok(DigitalOceanProvider)`: Ready to issue requests
    /// - `Err(Error)`: The token is empty or unusable, or the HTTP client
    ///   could not be built
    pub fn new(api_token: impl Into<String>, options: DigitalOceanOptions) -> Result<Self> {
        let api_token = api_token.into();

        if api_token.is_empty() {
            return Err(Error::config("DigitalOcean API token cannot be empty"));
        }

        if api_token.chars().any(char::is_whitespace)
            || HeaderValue::from_str(&format!("Bearer {}", api_token)).is_err()
        {
            return Err(Error::auth(
                "API token contains characters that cannot be sent in an HTTP header",
            ));
        }

        let base_url = Url::parse(options.base_url.trim_end_matches('/'))
            .map_err(|e| Error::config(format!("Invalid API base URL {}: {}", options.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("Invalid API base URL {}", options.base_url)));
        }

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url,
            client,
            dry_run: options.dry_run,
        })
    }

    /// Create a new DigitalOcean provider (production/live mode)
    pub fn new_live(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, DigitalOceanOptions::default())
    }

    /// Create a new DigitalOcean provider (dry-run mode)
    ///
    /// In dry-run mode, the provider will perform all GET requests but skip
    /// PUT updates, logging what would have been changed.
    pub fn new_dry_run(api_token: impl Into<String>) -> Result<Self> {
        Self::new(
            api_token,
            DigitalOceanOptions {
                dry_run: true,
                ..DigitalOceanOptions::default()
            },
        )
    }

    /// Whether updates are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// `<base>/domains/<domain>/records[/<record_id>]`
    ///
    /// The domain is pushed as a single percent-encoded path segment, so
    /// `/`, `?` and `#` cannot change which resource is addressed.
    fn domain_records_url(&self, domain: &str, record_id: Option<RecordId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["domains", domain, "records"]);
            if let Some(record_id) = record_id {
                segments.push(&record_id.to_string());
            }
        }
        url
    }

    fn records_url(&self, domain: &str) -> Url {
        let mut url = self.domain_records_url(domain, None);
        url.query_pairs_mut()
            .append_pair("per_page", &RECORDS_PER_PAGE.to_string());
        url
    }

    fn record_url(&self, domain: &str, record_id: RecordId) -> Url {
        self.domain_records_url(domain, Some(record_id))
    }

    /// Fetch one page of the record listing
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v2/domains/example.com/records?per_page=200
    /// Authorization: Bearer <token>
    /// ```
    async fn fetch_records_page(&self, url: &str, domain: &str) -> Result<RecordsPage> {
        tracing::debug!("Fetching records page: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, &format!("Domain {}", domain)).await);
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e)))
    }

    /// Retrieve a single record
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v2/domains/example.com/records/:record_id
    /// Authorization: Bearer <token>
    /// ```
    async fn get_domain_record(&self, domain: &str, record_id: RecordId) -> Result<DomainRecord> {
        let response = self
            .client
            .get(self.record_url(domain, record_id))
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, &format!("DNS record {}", record_id)).await);
        }

        let envelope: RecordEnvelope = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e)))?;

        Ok(envelope.domain_record)
    }
}

#[async_trait]
impl DnsProvider for DigitalOceanProvider {
    /// List every record of a domain
    ///
    /// Pages are requested one after another, following `links.pages.next`
    /// until the API stops returning one. A link to a page that was already
    /// fetched ends the listing.
    async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>> {
        let mut records = Vec::new();
        let mut url = self.records_url(domain).to_string();
        let mut visited = HashSet::new();

        loop {
            let page = self.fetch_records_page(&url, domain).await?;
            records.extend(page.domain_records);
            visited.insert(url);

            match page.links.pages.and_then(|p| p.next) {
                Some(next) if !visited.contains(&next) => url = next,
                Some(next) => {
                    tracing::warn!("Pagination link {} was already fetched, stopping", next);
                    break;
                }
                None => break,
            }
        }

        tracing::debug!("Listed {} record(s) for {}", records.len(), domain);
        Ok(records)
    }

    /// Set the data of one record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v2/domains/example.com/records/:record_id
    /// {
    ///   "data": "203.0.113.5"
    /// }
    /// ```
    async fn update_domain_record(
        &self,
        domain: &str,
        record_id: RecordId,
        data: &str,
    ) -> Result<DomainRecord> {
        let url = self.record_url(domain, record_id);
        let update_payload = serde_json::json!({ "data": data });

        // In dry-run mode, log the intended update and return success
        if self.dry_run {
            let mut record = self.get_domain_record(domain, record_id).await?;
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {} (was: {})",
                url,
                update_payload,
                record.data
            );
            record.data = data.to_string();
            return Ok(record);
        }

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(&update_payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, &format!("DNS record {}", record_id)).await);
        }

        let envelope: RecordEnvelope = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse response: {}", e)))?;

        tracing::debug!(
            "DNS record {} updated: {} -> {}",
            record_id,
            envelope.domain_record.name,
            envelope.domain_record.data
        );
        Ok(envelope.domain_record)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Map a non-success response to an error
///
/// `subject` names what was being accessed, for 404 and catch-all messages.
async fn status_error(response: reqwest::Response, subject: &str) -> Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    let message = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions. Status: {} - {}",
            status, message
        )),
        404 => Error::not_found(format!("{} not found: {}", subject, message)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("DigitalOcean server error (transient): {} - {}", status, message),
        ),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("Request for {} failed: {} - {}", subject, status, message),
        ),
    }
}

/// Factory for creating DigitalOcean providers
#[derive(Debug, Clone, Default)]
pub struct DigitalOceanFactory {
    options: DigitalOceanOptions,
}

impl DigitalOceanFactory {
    /// Create a factory whose providers share `options`
    pub fn new(options: DigitalOceanOptions) -> Self {
        if options.dry_run {
            tracing::warn!("DigitalOcean provider running in DRY-RUN mode - no changes will be made");
        }
        Self { options }
    }
}

impl DnsProviderFactory for DigitalOceanFactory {
    fn create(&self, api_key: &str) -> Result<Box<dyn DnsProvider>> {
        let provider = DigitalOceanProvider::new(api_key, self.options.clone())?;
        Ok(Box::new(provider))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
