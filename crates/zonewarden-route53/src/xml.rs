//! Route 53 XML documents
//!
//! Responses are deserialized with `quick_xml::de`; the one request body we
//! send is small enough to render directly.

use quick_xml::escape::escape;
use serde::Deserialize;
use zonewarden_core::traits::{DnsRecord, RecordType};

/// XML namespace of the 2013-04-01 API
pub(crate) const NAMESPACE: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// `ListResourceRecordSetsResponse`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets")]
    pub record_sets: ResourceRecordSets,

    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceRecordSets {
    #[serde(rename = "ResourceRecordSet")]
    pub items: Vec<ResourceRecordSet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceRecordSet {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Type")]
    pub record_type: String,

    /// Absent on alias records
    #[serde(rename = "TTL", default)]
    pub ttl: Option<u32>,

    #[serde(rename = "ResourceRecords", default)]
    pub resource_records: Option<ResourceRecords>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceRecords {
    #[serde(rename = "ResourceRecord")]
    pub items: Vec<ResourceRecordValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceRecordValue {
    #[serde(rename = "Value")]
    pub value: String,
}

impl From<ResourceRecordSet> for DnsRecord {
    fn from(set: ResourceRecordSet) -> Self {
        let value = set
            .resource_records
            .and_then(|records| records.items.into_iter().next())
            .map(|r| r.value);

        DnsRecord {
            name: set.name,
            record_type: RecordType::from(set.record_type),
            ttl: set.ttl,
            value,
        }
    }
}

/// `ChangeResourceRecordSetsResponse`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ChangeResourceRecordSetsResponse {
    #[serde(rename = "ChangeInfo")]
    pub change_info: ChangeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ChangeInfo {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "Status")]
    pub status: String,
}

/// Error document
///
/// Most errors come as `<ErrorResponse><Error>...</Error></ErrorResponse>`;
/// `InvalidChangeBatch` instead carries a `<Messages>` list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorDocument {
    #[serde(rename = "Error")]
    pub error: Option<ErrorDetail>,

    #[serde(rename = "Messages")]
    pub messages: Option<ErrorMessages>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "Code")]
    pub code: String,

    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorMessages {
    #[serde(rename = "Message")]
    pub items: Vec<String>,
}

/// Human-readable summary of an error body, falling back to the raw text
pub(crate) fn error_summary(body: &str) -> String {
    let Ok(doc) = quick_xml::de::from_str::<ErrorDocument>(body) else {
        return body.trim().to_string();
    };

    if let Some(error) = doc.error.filter(|e| !e.code.is_empty()) {
        return format!("{}: {}", error.code, error.message);
    }
    if let Some(messages) = doc.messages.filter(|m| !m.items.is_empty()) {
        return messages.items.join("; ");
    }
    body.trim().to_string()
}

/// Render a `ChangeResourceRecordSetsRequest` creating one record
pub(crate) fn create_request(record: &DnsRecord, default_ttl: u32) -> String {
    let value = record.value.as_deref().unwrap_or_default();
    let ttl = record.ttl.unwrap_or(default_ttl);

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<ChangeResourceRecordSetsRequest xmlns="{ns}">"#,
            "<ChangeBatch><Changes><Change>",
            "<Action>CREATE</Action>",
            "<ResourceRecordSet>",
            "<Name>{name}</Name>",
            "<Type>{rtype}</Type>",
            "<TTL>{ttl}</TTL>",
            "<ResourceRecords><ResourceRecord><Value>{value}</Value></ResourceRecord></ResourceRecords>",
            "</ResourceRecordSet>",
            "</Change></Changes></ChangeBatch>",
            "</ChangeResourceRecordSetsRequest>"
        ),
        ns = NAMESPACE,
        name = escape(&record.name),
        rtype = escape(record.record_type.as_str()),
        ttl = ttl,
        value = escape(value),
    )
}
