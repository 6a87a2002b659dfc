// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the updater.
//
// ## Architecture
//
// Issues one unauthenticated GET to an IP-echo service that answers with a
// JSON object carrying the caller's address:
//
// ```json
// {"ip": "203.0.113.5"}
// ```
//
// Only IPv4 answers are accepted, since the result is written to A records.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Default IP-echo service
pub const DEFAULT_IP_SERVICE_URL: &str = "http://ip.jsontest.com/";

/// Default HTTP timeout for the lookup (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Body returned by the IP-echo service
#[derive(Debug, Deserialize)]
struct IpEchoResponse {
    ip: String,
}

/// HTTP-based IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL of the IP-echo service (e.g., [`DEFAULT_IP_SERVICE_URL`])
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    ///
    /// # Returns
    ///
    /// - `Err(Error::Http)`: The HTTP client could not be built
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from the IP-echo service
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        tracing::debug!("Resolving public IP via {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        parse_ip_response(&body)
    }
}

/// Extract the IPv4 address from an IP-echo JSON body
pub fn parse_ip_response(body: &str) -> Result<Ipv4Addr> {
    let echo: IpEchoResponse = serde_json::from_str(body)
        .map_err(|e| Error::ip_source(format!("Invalid IP-echo response: {}", e)))?;

    let ip_text = echo.ip.trim();
    let ip: IpAddr = ip_text
        .parse()
        .map_err(|_| Error::ip_source(format!("Invalid IP address: {}", ip_text)))?;

    match ip {
        IpAddr::V4(v4) => Ok(v4),
        IpAddr::V6(_) => Err(Error::ip_source(format!("Expected IPv4, got: {}", ip))),
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let ip = self.fetch_ip().await?;
        Ok(IpAddr::V4(ip))
    }
}
