//! Run configuration
//!
//! A [`Configuration`] is built once from the raw command-line strings by
//! [`Configuration::parse`], which performs every validation rule before any
//! network call is made. The only later change is
//! [`Configuration::with_uniform_value`], used when no explicit record values
//! were given and the public IP address has been resolved.

use crate::error::{Error, Result};

/// Minimum length (in characters) of the api-key, domain and records inputs
pub const MIN_INPUT_LEN: usize = 2;

/// Validated updater configuration
///
/// Fields are read-only so that `record_values`, once present, always holds
/// at least one entry per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    api_key: String,
    domain: String,
    records: Vec<String>,
    record_values: Option<Vec<String>>,
}

impl Configuration {
    /// Validate the raw command-line inputs
    ///
    /// # Parameters
    ///
    /// - `api_key`: provider credential, at least 2 characters
    /// - `domain`: zone name, at least 2 characters
    /// - `records`: comma-separated host labels, e.g. `"remote, pc"`
    /// - `record_values`: optional comma-separated target values; an empty
    ///   string counts as absent
    ///
    /// # Returns
    ///
    /// - `Ok(Configuration)` with `record_values` padded to `records.len()`
    /// - `Err(Error::InvalidInput)` describing the first rule that failed
    pub fn parse(
        api_key: &str,
        domain: &str,
        records: &str,
        record_values: Option<&str>,
    ) -> Result<Self> {
        if api_key.chars().count() < MIN_INPUT_LEN {
            return Err(Error::invalid_input("Invalid api-key specified"));
        }

        if domain.chars().count() < MIN_INPUT_LEN {
            return Err(Error::invalid_input("Invalid domain specified"));
        }

        if records.chars().count() < MIN_INPUT_LEN {
            return Err(Error::invalid_input("Invalid records specified"));
        }

        let records = split_list(records);
        if records.iter().all(|r| r.is_empty()) {
            return Err(Error::invalid_input("No records specified"));
        }

        let record_values = match record_values.filter(|v| !v.is_empty()) {
            Some(raw) => Some(pad_values(split_list(raw), records.len())?),
            None => None,
        };

        Ok(Self {
            api_key: api_key.to_string(),
            domain: domain.to_string(),
            records,
            record_values,
        })
    }

    /// Provider API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Zone name, e.g. "example.com"
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Host labels to update, in user order (duplicates allowed)
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Target value per record, or `None` until the public IP is known
    pub fn record_values(&self) -> Option<&[String]> {
        self.record_values.as_deref()
    }

    /// Whether explicit target values were supplied
    pub fn has_record_values(&self) -> bool {
        self.record_values.is_some()
    }

    /// Fill absent record values with one value for every record
    ///
    /// Explicit values, if any, are left untouched.
    pub fn with_uniform_value(mut self, value: impl Into<String>) -> Self {
        if self.record_values.is_none() {
            self.record_values = Some(vec![value.into(); self.records.len()]);
        }
        self
    }

    /// Pair each record with its target value, in record order
    ///
    /// Values beyond `records.len()` are ignored. Yields nothing while the
    /// values are still unresolved.
    pub fn targets(&self) -> impl Iterator<Item = (&str, &str)> {
        let values = self.record_values.as_deref().unwrap_or_default();
        self.records
            .iter()
            .zip(values)
            .map(|(record, value)| (record.as_str(), value.as_str()))
    }
}

/// Split a comma-separated list, trimming each token
///
/// Empty tokens keep their position so values stay aligned by index.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Repeat the last value until there is one per record
fn pad_values(mut values: Vec<String>, records_len: usize) -> Result<Vec<String>> {
    let last = values
        .last()
        .cloned()
        .ok_or_else(|| Error::invalid_input("Invalid record-values specified"))?;

    if values.len() < records_len {
        values.resize(records_len, last);
    }

    Ok(values)
}
