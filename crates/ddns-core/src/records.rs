//! Domain records as listed by the provider

use serde::{Deserialize, Serialize};

/// Provider-assigned record identifier
pub type RecordId = u64;

/// Record type this updater manages
pub const A_RECORD: &str = "A";

/// A DNS record in the provider's zone listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// The record ID
    pub id: RecordId,

    /// Record type, e.g. "A", "AAAA", "MX"
    #[serde(rename = "type")]
    pub record_type: String,

    /// Host label relative to the zone ("@" for the apex)
    pub name: String,

    /// Current record value
    #[serde(default)]
    pub data: String,
}

impl DomainRecord {
    /// Whether this is an A record named `name`
    pub fn is_a_record_named(&self, name: &str) -> bool {
        self.record_type == A_RECORD && self.name == name
    }
}

/// Locate the A record named `name` in a zone listing
///
/// When the listing holds several A records with the same name, the one
/// listed last is returned.
pub fn find_a_record<'a>(records: &'a [DomainRecord], name: &str) -> Option<&'a DomainRecord> {
    records.iter().filter(|r| r.is_a_record_named(name)).last()
}
