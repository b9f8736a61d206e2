//! AWS Signature Version 4 request signing

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// HMAC-SHA256 of `data` under `key`
pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// `X-Amz-Date` timestamp, e.g. `20150830T123600Z`
pub(crate) fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Percent-encode and sort query parameters into their canonical form
///
/// The same string is used for the request URL, so what is signed is what
/// is sent.
pub(crate) fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Credentials plus the scope they sign for
#[derive(Clone)]
pub(crate) struct Signer {
    access_key_id: String,
    /// ⚠️ NEVER log this value
    secret_access_key: String,
    session_token: Option<String>,
    region: String,
    service: String,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<REDACTED>"),
            )
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl Signer {
    pub(crate) fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Headers covered by the signature, to be sent with the request
    pub(crate) fn signed_request_headers(&self, host: &str, amz_date: &str) -> Vec<(String, String)> {
        let mut headers = vec![
            ("host".to_string(), host.to_string()),
            ("x-amz-date".to_string(), amz_date.to_string()),
        ];
        if let Some(token) = &self.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers
    }

    /// Build the `Authorization` header value for a request
    ///
    /// `query` must already be canonical (see [`canonical_query`]).
    pub(crate) fn sign(
        &self,
        method: &str,
        uri: &str,
        query: &str,
        headers: &[(String, String)],
        payload: &[u8],
        amz_date: &str,
    ) -> String {
        let canonical_uri = if uri.is_empty() { "/" } else { uri };

        let mut sorted_headers: Vec<_> = headers.iter().collect();
        sorted_headers.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

        let canonical_headers =
            sorted_headers
                .iter()
                .fold(String::new(), |mut acc, (k, v)| {
                    let _ = writeln!(acc, "{}:{}", k.to_lowercase(), v.trim());
                    acc
                });

        let signed_headers = sorted_headers
            .iter()
            .map(|(k, _)| k.to_lowercase())
            .collect::<Vec<_>>()
            .join(";");

        let hashed_payload = hex::encode(Sha256::digest(payload));

        let canonical_request = format!(
            "{method}\n{canonical_uri}\n{query}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}"
        );
        tracing::trace!("CanonicalRequest:\n{canonical_request}");

        let date_stamp = amz_date.get(..8).unwrap_or(amz_date);
        let scope = format!(
            "{date_stamp}/{}/{}/aws4_request",
            self.region, self.service
        );
        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = format!("{ALGORITHM}\n{amz_date}\n{scope}\n{hashed_canonical_request}");

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(date_stamp),
            string_to_sign.as_bytes(),
        ));

        format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id
        )
    }

    fn signing_key(&self, date_stamp: &str) -> Vec<u8> {
        let k_secret = format!("AWS4{}", self.secret_access_key);
        let k_date = hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}
