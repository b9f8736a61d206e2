// # Heroku Domain Provisioner
//
// This crate registers custom domains on a Heroku app through the Platform
// API and returns the DNS target Heroku assigns to each one.
//
// ## Behavior
//
// - One POST per provisioning request; nothing is retried
// - Only `201 Created` counts as success
// - Any other status becomes `Error::Provisioning` carrying the response body
//
// ## API Reference
//
// - Create Domain: POST `/apps/{app}/domains`
//   `{"hostname": "...", "sni_endpoint": "..."}` -> `{"cname": "...", ...}`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use zonewarden_core::config::ProvisioningConfig;
use zonewarden_core::traits::{DomainProvisioner, ProvisioningResult};
use zonewarden_core::{Error, Result};

/// Heroku Platform API base URL
pub const HEROKU_API_BASE: &str = "https://api.heroku.com";

/// Platform API version selector
const HEROKU_ACCEPT: &str = "application/vnd.heroku+json; version=3";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct CreateDomainRequest<'a> {
    hostname: &'a str,
    sni_endpoint: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DomainResponse {
    #[serde(default)]
    cname: Option<String>,
}

/// Heroku custom-domain provisioner
pub struct HerokuProvisioner {
    /// Target app name or id
    app_name: String,

    /// Platform API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HerokuProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HerokuProvisioner")
            .field("app_name", &self.app_name)
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HerokuProvisioner {
    /// Create a new Heroku provisioner
    ///
    /// # Parameters
    ///
    /// - `app_name`: The Heroku app the domains are attached to
    /// - `api_token`: Platform API token
    pub fn new(app_name: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let app_name = app_name.into();
        let api_token = api_token.into();

        if app_name.is_empty() {
            return Err(Error::config("Heroku app name cannot be empty"));
        }
        if api_token.is_empty() {
            return Err(Error::config("Heroku API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            app_name,
            api_token,
            base_url: HEROKU_API_BASE.to_string(),
            client,
        })
    }

    /// Create a provisioner from the provisioning section of the configuration
    pub fn from_config(config: &ProvisioningConfig) -> Result<Self> {
        let app_name = config
            .app_name
            .as_deref()
            .ok_or_else(|| Error::config("APP_NAME is required for provisioning"))?;
        let api_token = config
            .api_token
            .as_deref()
            .ok_or_else(|| Error::config("API_KEY is required for provisioning"))?;

        let provisioner = Self::new(app_name, api_token)?;
        Ok(match config.endpoint.as_deref() {
            Some(endpoint) => provisioner.with_endpoint(endpoint),
            None => provisioner,
        })
    }

    /// Point the provisioner at another API base (e.g. a local mock)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.base_url = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Domains collection of the configured app, with the app name encoded
    fn domains_url(&self) -> String {
        format!(
            "{}/apps/{}/domains",
            self.base_url,
            urlencoding::encode(&self.app_name)
        )
    }
}

#[async_trait]
impl DomainProvisioner for HerokuProvisioner {
    /// Register `hostname` on the app
    ///
    /// ```http
    /// POST /apps/:app/domains
    /// Accept: application/vnd.heroku+json; version=3
    /// {"hostname": "www.example.com", "sni_endpoint": "tokyo-1234"}
    /// ```
    async fn create_custom_domain(
        &self,
        hostname: &str,
        certificate_ref: Option<&str>,
    ) -> Result<ProvisioningResult> {
        tracing::info!(
            "Registering custom domain {} on Heroku app {}",
            hostname,
            self.app_name
        );

        let url = self.domains_url();
        let payload = CreateDomainRequest {
            hostname,
            sni_endpoint: certificate_ref,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::ACCEPT, HEROKU_ACCEPT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        if status != StatusCode::CREATED {
            return Err(Error::provisioning(format!("{} {}", status.as_u16(), body)));
        }

        let domain: DomainResponse = serde_json::from_str(&body)?;
        let cname = domain
            .cname
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::provisioning(format!("response has no cname: {body}")))?;

        tracing::debug!("Heroku assigned {} to {}", cname, hostname);
        Ok(ProvisioningResult { cname })
    }

    fn provisioner_name(&self) -> &'static str {
        "heroku"
    }
}
