//! Test doubles and common utilities for update flow contract tests
//!
//! Every double keeps its counters behind an `Arc`, so a test can hand a
//! boxed clone to the `Updater` and still inspect the calls afterwards.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsProviderFactory, IpSource};
use ddns_core::{DomainRecord, RecordId};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that returns a fixed address (or fails) and counts calls
#[derive(Clone)]
pub struct CountingIpSource {
    ip: Option<IpAddr>,
    current_call_count: Arc<AtomicUsize>,
}

impl CountingIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip: Some(ip),
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// An IP source whose lookup always fails
    pub fn failing() -> Self {
        Self {
            ip: None,
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for CountingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .ok_or_else(|| Error::ip_source("IP-echo service unreachable"))
    }
}

/// One update_domain_record() call as seen by the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub domain: String,
    pub record_id: RecordId,
    pub data: String,
}

/// A mock DnsProvider serving a fixed zone listing and recording updates
#[derive(Clone)]
pub struct MockDnsProvider {
    records: Vec<DomainRecord>,
    failing_ids: HashSet<RecordId>,
    fail_listing: bool,
    list_call_count: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<UpdateCall>>>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DomainRecord>) -> Self {
        Self {
            records,
            failing_ids: HashSet::new(),
            fail_listing: false,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make updates of the given record fail
    pub fn failing_update_of(mut self, record_id: RecordId) -> Self {
        self.failing_ids.insert(record_id);
        self
    }

    /// Make list_domain_records() fail
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Get the number of times list_domain_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get every update call, including failed ones, in order
    pub fn updates(&self) -> Vec<UpdateCall> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(Error::not_found(format!("Domain not found: {}", domain)));
        }
        Ok(self.records.clone())
    }

    async fn update_domain_record(
        &self,
        domain: &str,
        record_id: RecordId,
        data: &str,
    ) -> Result<DomainRecord> {
        self.updates.lock().unwrap().push(UpdateCall {
            domain: domain.to_string(),
            record_id,
            data: data.to_string(),
        });

        if self.failing_ids.contains(&record_id) {
            return Err(Error::provider("mock", "Server error (transient): 503"));
        }

        let mut record = self
            .records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", record_id)))?;
        record.data = data.to_string();
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A factory handing out clones of one MockDnsProvider
#[derive(Clone)]
pub struct MockProviderFactory {
    provider: MockDnsProvider,
    reject_key: bool,
    create_call_count: Arc<AtomicUsize>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

impl MockProviderFactory {
    pub fn new(provider: MockDnsProvider) -> Self {
        Self {
            provider,
            reject_key: false,
            create_call_count: Arc::new(AtomicUsize::new(0)),
            api_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A factory that refuses every API key
    pub fn rejecting(provider: MockDnsProvider) -> Self {
        Self {
            reject_key: true,
            ..Self::new(provider)
        }
    }

    /// Get the number of times create() was called
    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// Get the API keys create() was called with
    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().unwrap().clone()
    }
}

impl DnsProviderFactory for MockProviderFactory {
    fn create(&self, api_key: &str) -> Result<Box<dyn DnsProvider>> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.api_keys.lock().unwrap().push(api_key.to_string());

        if self.reject_key {
            return Err(Error::auth("API key rejected"));
        }
        Ok(Box::new(self.provider.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to build an A record listing entry
pub fn a_record(id: RecordId, name: &str) -> DomainRecord {
    record(id, "A", name, "1.2.3.4")
}

/// Helper to build an arbitrary listing entry
pub fn record(id: RecordId, record_type: &str, name: &str, data: &str) -> DomainRecord {
    DomainRecord {
        id,
        record_type: record_type.to_string(),
        name: name.to_string(),
        data: data.to_string(),
    }
}

/// The public address used throughout the tests
pub fn public_ip() -> IpAddr {
    IpAddr::from([203, 0, 113, 5])
}
