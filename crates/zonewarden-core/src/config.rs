//! Configuration types for zonewarden
//!
//! Configuration is read once at the start of an invocation (normally from
//! environment variables) and passed explicitly into every client and into
//! the [`crate::Reconciler`]. Nothing is stored globally.
//!
//! ## Environment
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `HOSTED_ZONE_ID` | hosted zone to reconcile | required |
//! | `RECORD_TTL` | TTL of created records | 300 |
//! | `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` | DNS API credentials | required |
//! | `AWS_SESSION_TOKEN` | temporary-credential token | none |
//! | `PROVISION_ENABLED` | enable the create path | false |
//! | `APP_NAME` | PaaS application | required when enabled |
//! | `HOSTNAME` | custom-domain hostname | the record name |
//! | `API_KEY` | PaaS API token | required when enabled |
//! | `CERTIFICATE_NAME` | certificate / SNI endpoint | none |
//! | `DATADOG_API_KEY` | log sink key | none (logs stay local) |
//! | `DD_SITE` | log sink site | `us5.datadoghq.com` |
//! | `ENV` | environment tag | `DEV` |
//! | `DD_SERVICE` / `DD_SOURCE` / `DD_HOSTNAME` | log event attributes | see defaults |
//! | `ZONEWARDEN_LOG_LEVEL` | local log level | `info` |

use crate::traits::LogContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default TTL for records created by the provisioning path
pub const DEFAULT_RECORD_TTL: u32 = 300;

/// Default Datadog site
pub const DEFAULT_LOG_SITE: &str = "us5.datadoghq.com";

/// Default deployment environment tag
pub const DEFAULT_ENVIRONMENT: &str = "DEV";

/// Default service name attached to forwarded log lines
pub const DEFAULT_SERVICE_NAME: &str = "INSPECTPOINT-DNS-AUTOMATION";

/// Default source tag attached to forwarded log lines
pub const DEFAULT_LOG_SOURCE: &str = "rust";

/// Route 53 accepts TTLs up to 2^31 - 1 seconds
const MAX_RECORD_TTL: u32 = i32::MAX as u32;

/// Main configuration for one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonewardenConfig {
    /// DNS provider settings
    pub dns: DnsConfig,

    /// Custom-domain provisioning settings
    #[serde(default)]
    pub provisioning: ProvisioningConfig,

    /// Log sink settings
    #[serde(default)]
    pub log_sink: LogSinkConfig,

    /// Local tracing level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ZonewardenConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset. The result is validated before it
    /// is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let record_ttl = match get("RECORD_TTL") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                crate::Error::config(format!("RECORD_TTL must be a positive integer. Got: {raw}"))
            })?,
            None => DEFAULT_RECORD_TTL,
        };

        let enabled = match get("PROVISION_ENABLED") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                crate::Error::config(format!(
                    "PROVISION_ENABLED must be true or false. Got: {raw}"
                ))
            })?,
            None => false,
        };

        let config = Self {
            dns: DnsConfig {
                hosted_zone_id: get("HOSTED_ZONE_ID").unwrap_or_default(),
                record_ttl,
                access_key_id: get("AWS_ACCESS_KEY_ID").unwrap_or_default(),
                secret_access_key: get("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
                session_token: get("AWS_SESSION_TOKEN"),
                endpoint: get("ROUTE53_ENDPOINT"),
            },
            provisioning: ProvisioningConfig {
                enabled,
                app_name: get("APP_NAME"),
                target_hostname: get("HOSTNAME"),
                api_token: get("API_KEY"),
                certificate_name: get("CERTIFICATE_NAME"),
                endpoint: get("HEROKU_API_ENDPOINT"),
            },
            log_sink: LogSinkConfig {
                api_key: get("DATADOG_API_KEY"),
                site: get("DD_SITE").unwrap_or_else(|| DEFAULT_LOG_SITE.to_string()),
                environment: get("ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
                service: get("DD_SERVICE").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
                source: get("DD_SOURCE").unwrap_or_else(|| DEFAULT_LOG_SOURCE.to_string()),
                hostname: get("DD_HOSTNAME"),
                endpoint: get("DD_LOGS_ENDPOINT"),
            },
            log_level: get("ZONEWARDEN_LOG_LEVEL").unwrap_or_else(default_log_level),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.dns.validate()?;
        self.provisioning.validate()?;
        self.log_sink.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(crate::Error::config(format!(
                "ZONEWARDEN_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                self.log_level
            ))),
        }
    }

    /// Settings the reconciliation handler needs
    pub fn reconciler(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            zone_id: self.dns.hosted_zone_id.clone(),
            record_ttl: self.dns.record_ttl,
            target_hostname: self.provisioning.target_hostname.clone(),
            certificate_ref: self.provisioning.certificate_name.clone(),
        }
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Hosted zone identifier
    pub hosted_zone_id: String,

    /// TTL for created records
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,

    /// API access key id
    pub access_key_id: String,

    /// API secret key
    /// ⚠️ NEVER log this value
    pub secret_access_key: String,

    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<String>,

    /// Endpoint override (tests, private endpoints)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl DnsConfig {
    /// Validate the DNS provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hosted_zone_id.is_empty() {
            return Err(crate::Error::config(
                "HOSTED_ZONE_ID is required. Set it via: export HOSTED_ZONE_ID=Z0123456789",
            ));
        }
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(crate::Error::config(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY are required",
            ));
        }
        if self.record_ttl == 0 || self.record_ttl > MAX_RECORD_TTL {
            return Err(crate::Error::config(format!(
                "RECORD_TTL must be between 1 and {MAX_RECORD_TTL}. Got: {}",
                self.record_ttl
            )));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides credentials
impl fmt::Debug for DnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsConfig")
            .field("hosted_zone_id", &self.hosted_zone_id)
            .field("record_ttl", &self.record_ttl)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<REDACTED>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Custom-domain provisioning configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Whether missing records are provisioned and created
    #[serde(default)]
    pub enabled: bool,

    /// PaaS application name
    #[serde(default)]
    pub app_name: Option<String>,

    /// Hostname to register; falls back to the requested record name
    #[serde(default)]
    pub target_hostname: Option<String>,

    /// PaaS API token
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub api_token: Option<String>,

    /// Certificate reference (SNI endpoint) to bind
    #[serde(default)]
    pub certificate_name: Option<String>,

    /// Endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ProvisioningConfig {
    /// Validate the provisioning configuration
    ///
    /// Only checked when provisioning is enabled.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.enabled {
            return Ok(());
        }
        if self.app_name.as_deref().is_none_or(str::is_empty) {
            return Err(crate::Error::config(
                "APP_NAME is required when PROVISION_ENABLED=true",
            ));
        }
        if self.api_token.as_deref().is_none_or(str::is_empty) {
            return Err(crate::Error::config(
                "API_KEY is required when PROVISION_ENABLED=true",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ProvisioningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningConfig")
            .field("enabled", &self.enabled)
            .field("app_name", &self.app_name)
            .field("target_hostname", &self.target_hostname)
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .field("certificate_name", &self.certificate_name)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Log sink configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LogSinkConfig {
    /// API key; when absent log lines are only written locally
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub api_key: Option<String>,

    /// Site / region of the log intake
    #[serde(default = "default_site")]
    pub site: String,

    /// Deployment environment tag
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Service name
    #[serde(default = "default_service")]
    pub service: String,

    /// Source tag
    #[serde(default = "default_source")]
    pub source: String,

    /// Hostname attached to events
    #[serde(default)]
    pub hostname: Option<String>,

    /// Endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl LogSinkConfig {
    /// Validate the log sink configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.is_some() && self.site.is_empty() && self.endpoint.is_none() {
            return Err(crate::Error::config(
                "DD_SITE cannot be empty when DATADOG_API_KEY is set",
            ));
        }
        Ok(())
    }

    /// Static attributes for every forwarded event
    pub fn context(&self) -> LogContext {
        LogContext::new(&self.service, &self.source)
            .with_tag("env", &self.environment)
            .with_hostname(self.hostname.clone())
    }
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            site: default_site(),
            environment: default_environment(),
            service: default_service(),
            source: default_source(),
            hostname: None,
            endpoint: None,
        }
    }
}

impl fmt::Debug for LogSinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSinkConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("site", &self.site)
            .field("environment", &self.environment)
            .field("service", &self.service)
            .field("source", &self.source)
            .field("hostname", &self.hostname)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Settings for [`crate::Reconciler`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Hosted zone to reconcile
    pub zone_id: String,

    /// TTL for created records
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,

    /// Hostname registered with the provisioner (defaults to the record name)
    #[serde(default)]
    pub target_hostname: Option<String>,

    /// Certificate reference passed to the provisioner
    #[serde(default)]
    pub certificate_ref: Option<String>,
}

impl ReconcilerConfig {
    /// Create a reconciler configuration for a zone with default TTL
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            record_ttl: DEFAULT_RECORD_TTL,
            target_hostname: None,
            certificate_ref: None,
        }
    }

    /// Set the TTL of created records
    pub fn with_record_ttl(mut self, ttl: u32) -> Self {
        self.record_ttl = ttl;
        self
    }

    /// Set the hostname registered with the provisioner
    pub fn with_target_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.target_hostname = Some(hostname.into());
        self
    }

    /// Set the certificate reference
    pub fn with_certificate_ref(mut self, certificate: impl Into<String>) -> Self {
        self.certificate_ref = Some(certificate.into());
        self
    }

    /// Validate the reconciler configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Zone id cannot be empty"));
        }
        if self.record_ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_site() -> String {
    DEFAULT_LOG_SITE.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_service() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_source() -> String {
    DEFAULT_LOG_SOURCE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn minimal_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("HOSTED_ZONE_ID", "Z0123456789"),
            ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        ]
    }

    #[test]
    fn test_minimal_environment_uses_defaults() {
        let config = ZonewardenConfig::from_lookup(lookup_from(&minimal_vars())).unwrap();

        assert_eq!(config.dns.hosted_zone_id, "Z0123456789");
        assert_eq!(config.dns.record_ttl, DEFAULT_RECORD_TTL);
        assert!(!config.provisioning.enabled);
        assert_eq!(config.log_sink.site, DEFAULT_LOG_SITE);
        assert_eq!(config.log_sink.environment, "DEV");
        assert!(config.log_sink.api_key.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_zone_is_rejected() {
        let vars = [
            ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ];
        let err = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("HOSTED_ZONE_ID"));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let mut vars = minimal_vars();
        vars.push(("DATADOG_API_KEY", "   "));
        let config = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.log_sink.api_key.is_none());
    }

    #[test]
    fn test_enabled_provisioning_requires_app_and_token() {
        let mut vars = minimal_vars();
        vars.push(("PROVISION_ENABLED", "true"));
        let err = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("APP_NAME"));

        vars.push(("APP_NAME", "my-app"));
        let err = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("API_KEY"));

        vars.push(("API_KEY", "heroku-token"));
        let config = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.provisioning.enabled);
    }

    #[test]
    fn test_invalid_flag_and_ttl() {
        let mut vars = minimal_vars();
        vars.push(("PROVISION_ENABLED", "maybe"));
        assert!(ZonewardenConfig::from_lookup(lookup_from(&vars)).is_err());

        let mut vars = minimal_vars();
        vars.push(("RECORD_TTL", "five minutes"));
        assert!(ZonewardenConfig::from_lookup(lookup_from(&vars)).is_err());

        let mut vars = minimal_vars();
        vars.push(("RECORD_TTL", "0"));
        assert!(ZonewardenConfig::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut vars = minimal_vars();
        vars.push(("ZONEWARDEN_LOG_LEVEL", "loud"));
        assert!(ZonewardenConfig::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn test_reconciler_settings() {
        let mut vars = minimal_vars();
        vars.extend([
            ("RECORD_TTL", "600"),
            ("HOSTNAME", "www.example.com"),
            ("CERTIFICATE_NAME", "tokyo-12345"),
        ]);
        let config = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap();
        let reconciler = config.reconciler();

        assert_eq!(reconciler.zone_id, "Z0123456789");
        assert_eq!(reconciler.record_ttl, 600);
        assert_eq!(reconciler.target_hostname.as_deref(), Some("www.example.com"));
        assert_eq!(reconciler.certificate_ref.as_deref(), Some("tokyo-12345"));
    }

    #[test]
    fn test_log_context_carries_env_tag() {
        let mut vars = minimal_vars();
        vars.extend([("ENV", "PROD"), ("DD_HOSTNAME", "worker-1")]);
        let config = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap();
        let context = config.log_sink.context();

        assert_eq!(context.service, DEFAULT_SERVICE_NAME);
        assert_eq!(context.tags.get("env").map(String::as_str), Some("PROD"));
        assert_eq!(context.hostname.as_deref(), Some("worker-1"));
    }

    #[test]
    fn test_secrets_not_exposed_in_debug() {
        let mut vars = minimal_vars();
        vars.extend([
            ("AWS_SESSION_TOKEN", "session-secret-token"),
            ("DATADOG_API_KEY", "dd-secret-key"),
            ("PROVISION_ENABLED", "yes"),
            ("APP_NAME", "my-app"),
            ("API_KEY", "heroku-secret-token"),
        ]);
        let config = ZonewardenConfig::from_lookup(lookup_from(&vars)).unwrap();
        let debug_str = format!("{:?}", config);

        assert!(!debug_str.contains("wJalrXUtnFEMI"));
        assert!(!debug_str.contains("session-secret-token"));
        assert!(!debug_str.contains("dd-secret-key"));
        assert!(!debug_str.contains("heroku-secret-token"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn test_reconciler_config_validation() {
        assert!(ReconcilerConfig::new("Z1").validate().is_ok());
        assert!(ReconcilerConfig::new("  ").validate().is_err());
        assert!(ReconcilerConfig::new("Z1").with_record_ttl(0).validate().is_err());
    }
}
