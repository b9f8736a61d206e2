// # Route 53 DNS Provider
//
// This crate provides an Amazon Route 53 implementation of `DnsProvider`,
// talking to the Route 53 REST API directly (XML over HTTPS, SigV4-signed).
//
// ## Behavior
//
// - One HTTP request per trait call; nothing is retried or cached
// - HTTP timeout configured (30 seconds)
// - Specific error mapping for HTTP status codes (400, 401/403, 404, 429, 5xx)
// - An `InvalidChangeBatch` saying the record already exists maps to
//   `Error::AlreadyExists`; any other rejected change batch is a provider error
//
// ## Security Requirements
//
// - The secret access key and session token NEVER appear in logs
// - Credentials come from the environment only
// - Construction fails fast if either key is empty
//
// ## API Reference
//
// - List records: GET `/2013-04-01/hostedzone/{Id}/rrset?name=..&type=..&maxitems=..`
// - Change records: POST `/2013-04-01/hostedzone/{Id}/rrset/`

mod sign;
mod xml;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode, Url};
use sign::Signer;
use std::time::Duration;
use zonewarden_core::config::DnsConfig;
use zonewarden_core::traits::{DnsProvider, DnsRecord, RecordType};
use zonewarden_core::{Error, Result};

/// Route 53 API base URL (global endpoint)
pub const ROUTE53_API_BASE: &str = "https://route53.amazonaws.com";

/// Route 53 API version path segment
const API_VERSION: &str = "2013-04-01";

/// Route 53 is a global service signed in us-east-1
const SIGNING_REGION: &str = "us-east-1";
const SIGNING_SERVICE: &str = "route53";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// TTL used when a record to create carries none
const FALLBACK_TTL: u32 = 300;

/// Route 53 DNS provider
///
/// # Security
///
/// The Debug implementation does NOT expose the secret key or session token.
pub struct Route53Provider {
    /// Credentials and signing scope
    signer: Signer,

    /// API base, without trailing slash
    base_url: String,

    /// `host[:port]` of the API base, as signed
    host: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("signer", &self.signer)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Route53Provider {
    /// Create a new Route 53 provider against the public endpoint
    ///
    /// # Parameters
    ///
    /// - `access_key_id`: AWS access key id
    /// - `secret_access_key`: AWS secret access key
    /// - `session_token`: Optional session token for temporary credentials
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if either key is empty and `Error::Http` if
    /// the HTTP client cannot be built.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Result<Self> {
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();

        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return Err(Error::config("AWS access key id and secret access key are required"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        let signer = Signer::new(
            access_key_id,
            secret_access_key,
            session_token.filter(|t| !t.is_empty()),
            SIGNING_REGION,
            SIGNING_SERVICE,
        );

        Self {
            signer,
            base_url: String::new(),
            host: String::new(),
            client,
        }
        .with_endpoint(ROUTE53_API_BASE)
    }

    /// Create a provider from the DNS section of the configuration
    pub fn from_config(config: &DnsConfig) -> Result<Self> {
        let provider = Self::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            config.session_token.clone(),
        )?;

        match config.endpoint.as_deref() {
            Some(endpoint) => provider.with_endpoint(endpoint),
            None => Ok(provider),
        }
    }

    /// Point the provider at another API base (e.g. a local mock)
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::config(format!("Invalid Route 53 endpoint '{endpoint}': {e}")))?;

        let host = url
            .host_str()
            .ok_or_else(|| Error::config(format!("Route 53 endpoint has no host: {endpoint}")))?;

        self.host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        self.base_url = endpoint.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Send one signed request and return the status and body
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: Option<String>,
    ) -> Result<(StatusCode, String)> {
        let amz_date = sign::amz_date(Utc::now());
        let headers = self.signer.signed_request_headers(&self.host, &amz_date);
        let payload = body.as_deref().unwrap_or_default();

        let authorization = self.signer.sign(
            method.as_str(),
            path,
            query,
            &headers,
            payload.as_bytes(),
            &amz_date,
        );

        let url = if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        };

        // reqwest derives Host from the URL; it is signed but not set twice.
        let mut request = self.client.request(method, &url);
        for (name, value) in headers.iter().filter(|(name, _)| name != "host") {
            request = request.header(name.as_str(), value.as_str());
        }
        request = request.header(reqwest::header::AUTHORIZATION, authorization);

        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/xml")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {e}")))?;

        Ok((status, text))
    }

    fn rrset_path(zone_id: &str) -> String {
        format!("/{API_VERSION}/hostedzone/{}/rrset", hosted_zone_id(zone_id))
    }
}

/// Strip the `/hostedzone/` prefix the API itself reports zone ids with
fn hosted_zone_id(zone_id: &str) -> &str {
    zone_id.trim_start_matches("/hostedzone/").trim_matches('/')
}

/// Map a non-success status onto the workspace error type
fn status_error(status: StatusCode, body: &str, action: &str) -> Error {
    let summary = xml::error_summary(body);

    match status.as_u16() {
        400 if body.contains("InvalidChangeBatch") && summary.contains("already exists") => {
            Error::already_exists(summary)
        }
        401 | 403 => Error::auth(format!(
            "Route 53 rejected the credentials or they lack permission. Status: {status} - {summary}"
        )),
        404 => Error::not_found(summary),
        429 => Error::provider(
            "route53",
            format!("Rate limit exceeded. Please retry later. Status: {status}"),
        ),
        500..=599 => Error::provider(
            "route53",
            format!("Route 53 server error (transient): {status} - {summary}"),
        ),
        _ => Error::provider("route53", format!("{action} failed: {status} - {summary}")),
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    /// List records starting at `(record_name, record_type)`
    ///
    /// ```http
    /// GET /2013-04-01/hostedzone/{Id}/rrset?maxitems=1&name=foo.example.com&type=CNAME
    /// ```
    async fn lookup(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &RecordType,
        max_items: u32,
    ) -> Result<Vec<DnsRecord>> {
        if hosted_zone_id(zone_id).is_empty() {
            return Err(Error::invalid_input("hosted zone id cannot be empty"));
        }
        if record_name.is_empty() {
            return Err(Error::invalid_input("record name cannot be empty"));
        }

        tracing::debug!(
            "Listing Route 53 records from {} (type: {}, max: {})",
            record_name,
            record_type,
            max_items
        );

        let max_items = max_items.to_string();
        let query = sign::canonical_query(&[
            ("name", record_name),
            ("type", record_type.as_str()),
            ("maxitems", &max_items),
        ]);

        let (status, body) = self
            .send(Method::GET, &Self::rrset_path(zone_id), &query, None)
            .await?;

        if !status.is_success() {
            return Err(status_error(status, &body, "Record lookup"));
        }

        let parsed: xml::ListResourceRecordSetsResponse = quick_xml::de::from_str(&body)
            .map_err(|e| Error::provider("route53", format!("Failed to parse response: {e}")))?;

        let truncated = parsed.is_truncated;
        let records: Vec<DnsRecord> = parsed
            .record_sets
            .items
            .into_iter()
            .map(DnsRecord::from)
            .collect();

        tracing::debug!(
            "Route 53 returned {} record(s) (truncated: {})",
            records.len(),
            truncated
        );
        Ok(records)
    }

    /// Create a record with a single `CREATE` change
    ///
    /// ```http
    /// POST /2013-04-01/hostedzone/{Id}/rrset/
    /// <ChangeResourceRecordSetsRequest>...</ChangeResourceRecordSetsRequest>
    /// ```
    async fn create(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        if hosted_zone_id(zone_id).is_empty() {
            return Err(Error::invalid_input("hosted zone id cannot be empty"));
        }
        if record.value.as_deref().is_none_or(str::is_empty) {
            return Err(Error::invalid_input(format!(
                "record {} has no value to create",
                record.name
            )));
        }

        tracing::info!(
            "Creating Route 53 record: {} ({}) -> {}",
            record.name,
            record.record_type,
            record.value.as_deref().unwrap_or_default()
        );

        let path = format!("{}/", Self::rrset_path(zone_id));
        let body = xml::create_request(record, FALLBACK_TTL);

        let (status, response) = self.send(Method::POST, &path, "", Some(body)).await?;

        if !status.is_success() {
            return Err(status_error(status, &response, "Record create"));
        }

        match quick_xml::de::from_str::<xml::ChangeResourceRecordSetsResponse>(&response) {
            Ok(parsed) => tracing::debug!(
                "Route 53 change {} is {}",
                parsed.change_info.id,
                parsed.change_info.status
            ),
            Err(e) => tracing::debug!("Unparsed change response: {e}"),
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}
