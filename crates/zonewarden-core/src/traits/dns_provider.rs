// # DNS Provider Trait
//
// Defines the interface for reading and creating records in a hosted zone.
//
// ## Implementations
//
// - Route 53: `zonewarden-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use zonewarden_core::traits::{DnsProvider, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     // Start-key listing: may return the record *after* the one requested
//     let records = provider
//         .lookup("Z123", "app.example.com", &RecordType::Cname, 1)
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name (alias)
    Cname,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
    /// Text
    Txt,
    /// Certification authority authorization
    Caa,
    /// Pointer
    Ptr,
    /// Any type the provider reports that is not modelled above
    Other(String),
}

impl RecordType {
    /// Wire representation (upper case, as DNS providers expect)
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
            RecordType::Caa => "CAA",
            RecordType::Ptr => "PTR",
            RecordType::Other(other) => other,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    // Unknown types are kept verbatim so that a type mismatch is still visible
    // to the matching logic instead of being coerced to a known variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "SOA" => RecordType::Soa,
            "SRV" => RecordType::Srv,
            "TXT" => RecordType::Txt,
            "CAA" => RecordType::Caa,
            "PTR" => RecordType::Ptr,
            other => RecordType::Other(other.to_string()),
        })
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(record_type) => record_type,
            Err(never) => match never {},
        }
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        record_type.as_str().to_string()
    }
}

/// A DNS resource record as reported by (or sent to) a DNS provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record name, possibly fully qualified with a trailing dot
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Time-to-live in seconds (absent for alias records)
    pub ttl: Option<u32>,
    /// First record value, e.g. the CNAME target
    pub value: Option<String>,
}

impl DnsRecord {
    /// Create a CNAME record pointing `name` at `target`
    pub fn cname(name: impl Into<String>, target: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::Cname,
            ttl: Some(ttl),
            value: Some(target.into()),
        }
    }

    /// Whether this record is the `(name, record_type)` pair being asked for.
    ///
    /// Names are compared after [`normalize_name`]; types must be identical.
    pub fn matches(&self, name: &str, record_type: &RecordType) -> bool {
        self.record_type == *record_type && normalize_name(&self.name) == normalize_name(name)
    }
}

/// Normalize a DNS name for comparison.
///
/// Trailing dots are stripped and ASCII letters are lower-cased, so
/// `App.Example.com.` and `app.example.com` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Trait for DNS provider implementations
///
/// Implementations wrap a hosted-zone API. They are single-shot: one API
/// call per method invocation, no retries, no caching.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List records starting at `record_name` / `record_type`
    ///
    /// This is a start-key listing: the provider returns up to `max_items`
    /// records ordered at-or-after the requested key. It does **not**
    /// guarantee that the first record is the one requested; callers must
    /// check with [`DnsRecord::matches`].
    ///
    /// # Parameters
    ///
    /// - `zone_id`: The hosted zone identifier
    /// - `record_name`: The record name to start listing at
    /// - `record_type`: The record type to start listing at
    /// - `max_items`: Maximum number of records to return
    async fn lookup(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &RecordType,
        max_items: u32,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record in the hosted zone
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The record was created
    /// - `Err(Error::AlreadyExists)`: A conflicting record is already present
    /// - `Err(_)`: Any other provider-side failure
    async fn create(&self, zone_id: &str, record: &DnsRecord) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
