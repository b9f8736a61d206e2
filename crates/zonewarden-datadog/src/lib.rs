// # Datadog Log Sink
//
// Forwards reconciliation log lines to the Datadog HTTP logs intake.
//
// Delivery is best-effort: a failed POST is reported through `tracing` at
// warn level and otherwise ignored. The API key never appears in logs.
//
// ## API Reference
//
// - Send Logs: POST `https://http-intake.logs.{site}/api/v2/logs`
//   `[{"ddsource", "ddtags", "hostname", "message", "service", "status"}]`

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use zonewarden_core::config::LogSinkConfig;
use zonewarden_core::traits::{LogContext, LogEvent, LogLevel, LogSink};
use zonewarden_core::{Error, Result};

/// Path of the v2 logs intake
const INTAKE_PATH: &str = "/api/v2/logs";

/// Default HTTP timeout for intake requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the intake payload
#[derive(Debug, Serialize)]
struct IntakeEntry<'a> {
    ddsource: &'a str,
    ddtags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<&'a str>,
    message: &'a str,
    service: &'a str,
    status: &'static str,
}

impl<'a> From<&'a LogEvent> for IntakeEntry<'a> {
    fn from(event: &'a LogEvent) -> Self {
        Self {
            ddsource: &event.source,
            ddtags: event.tag_string(),
            hostname: event.hostname.as_deref(),
            message: &event.message,
            service: &event.service,
            status: event.level.as_str(),
        }
    }
}

/// Datadog logs-intake sink
pub struct DatadogLogSink {
    /// ⚠️ NEVER log this value
    api_key: String,

    /// Full intake URL
    intake_url: String,

    /// Attributes attached to every event
    context: LogContext,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DatadogLogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogLogSink")
            .field("api_key", &"<REDACTED>")
            .field("intake_url", &self.intake_url)
            .field("context", &self.context)
            .finish()
    }
}

impl DatadogLogSink {
    /// Create a sink for the given Datadog site (e.g. `us5.datadoghq.com`)
    pub fn new(api_key: impl Into<String>, site: &str, context: LogContext) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Datadog API key cannot be empty"));
        }
        if site.is_empty() {
            return Err(Error::config("Datadog site cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            intake_url: format!("https://http-intake.logs.{site}{INTAKE_PATH}"),
            context,
            client,
        })
    }

    /// Create a sink from the log section of the configuration
    ///
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &LogSinkConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        let sink = Self::new(api_key, &config.site, config.context())?;
        Ok(Some(match config.endpoint.as_deref() {
            Some(endpoint) => sink.with_endpoint(endpoint),
            None => sink,
        }))
    }

    /// Send to another intake base (e.g. a local mock)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.intake_url = format!("{}{INTAKE_PATH}", endpoint.trim_end_matches('/'));
        self
    }

    async fn send(&self, event: &LogEvent) -> Result<()> {
        let payload = [IntakeEntry::from(event)];

        let response = self
            .client
            .post(&self.intake_url)
            .header("DD-API-KEY", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::log_sink(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::log_sink(format!("intake returned {status}: {body}")));
        }

        Ok(())
    }
}

#[async_trait]
impl LogSink for DatadogLogSink {
    async fn log(&self, message: &str, level: LogLevel) {
        let event = self.context.event(message, level);
        if let Err(e) = self.send(&event).await {
            tracing::warn!("Failed to forward log line to Datadog: {}", e);
        }
    }

    fn sink_name(&self) -> &'static str {
        "datadog"
    }
}
