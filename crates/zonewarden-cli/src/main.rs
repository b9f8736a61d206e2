// # zonewarden - single-invocation DNS record reconciler
//
// This binary is a thin wiring layer. All decision logic lives in
// zonewarden-core; the API clients live in their own crates.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the DNS provider, the optional provisioner and the log sink
// 4. Handling one event and printing the response
//
// ## Input / Output
//
// The event `{"record": "<name>"}` is read from the first argument, or from
// stdin when no argument is given. The response
// `{"statusCode": 200|500, "body": "<json>"}` is printed on stdout; local
// logs go to stderr.
//
// ## Configuration
//
// ### DNS Provider (Route 53)
// - `HOSTED_ZONE_ID`: Hosted zone to check (required)
// - `RECORD_TTL`: TTL for created records (default 300)
// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`: Credentials (required)
// - `AWS_SESSION_TOKEN`: Session token for temporary credentials
//
// ### Provisioning (Heroku)
// - `PROVISION_ENABLED`: Enable the create path (default false)
// - `APP_NAME`, `API_KEY`: App and Platform API token (required when enabled)
// - `HOSTNAME`: Hostname to register (defaults to the record name)
// - `CERTIFICATE_NAME`: SNI endpoint to bind
//
// ### Log Sink (Datadog)
// - `DATADOG_API_KEY`: Enables forwarding when set
// - `DD_SITE`, `ENV`, `DD_SERVICE`, `DD_SOURCE`, `DD_HOSTNAME`
//
// ### Local logging
// - `ZONEWARDEN_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ### Endpoint overrides (testing)
// - `ROUTE53_ENDPOINT`, `HEROKU_API_ENDPOINT`, `DD_LOGS_ENDPOINT`
//
// ## Example
//
// ```bash
// export HOSTED_ZONE_ID=Z0123456789ABC
// export AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=...
//
// zonewarden '{"record": "app.example.com"}'
// ```

use anyhow::{Context, Result};
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use zonewarden_core::traits::{DomainProvisioner, LogSink, NullLogSink};
use zonewarden_core::{InvocationResponse, Reconciler, ReconciliationRequest, ZonewardenConfig};
use zonewarden_datadog::DatadogLogSink;
use zonewarden_heroku::HerokuProvisioner;
use zonewarden_route53::Route53Provider;

/// Exit codes for the possible invocation results
///
/// - 0: The invocation was handled (statusCode 200)
/// - 1: Configuration or startup error; no event was handled
/// - 2: The invocation failed (statusCode 500)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZonewardenExitCode {
    /// statusCode 200
    Handled = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// statusCode 500
    InvocationFailed = 2,
}

impl From<ZonewardenExitCode> for ExitCode {
    fn from(code: ZonewardenExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&InvocationResponse> for ZonewardenExitCode {
    fn from(response: &InvocationResponse) -> Self {
        if response.is_success() {
            ZonewardenExitCode::Handled
        } else {
            ZonewardenExitCode::InvocationFailed
        }
    }
}

fn main() -> ExitCode {
    // Load and validate configuration from environment
    let config = match ZonewardenConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ZonewardenExitCode::ConfigError.into();
        }
    };

    // Initialize tracing; stdout is reserved for the response
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonewardenExitCode::ConfigError.into();
    }

    let event = match read_event(std::env::args().nth(1)) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to read invocation event: {:#}", e);
            return ZonewardenExitCode::ConfigError.into();
        }
    };

    let reconciler = match build_reconciler(&config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return ZonewardenExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonewardenExitCode::ConfigError.into();
        }
    };

    let response = rt.block_on(async {
        match parse_request(&event) {
            Ok(request) => reconciler.handle(&request).await,
            Err(e) => {
                let message = format!("An error occurred: {e}");
                error!("{}", message);
                InvocationResponse::error(&message)
            }
        }
    });

    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            return ZonewardenExitCode::InvocationFailed.into();
        }
    }

    ZonewardenExitCode::from(&response).into()
}

/// Read the raw event from the argument, or from stdin when there is none
fn read_event(arg: Option<String>) -> Result<String> {
    if let Some(arg) = arg {
        return Ok(arg);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("reading event from stdin")?;
    Ok(buffer)
}

/// Parse an event document
fn parse_request(event: &str) -> zonewarden_core::Result<ReconciliationRequest> {
    Ok(serde_json::from_str(event.trim())?)
}

/// Wire the clients named by the configuration into a reconciler
fn build_reconciler(config: &ZonewardenConfig) -> Result<Reconciler> {
    let dns = Route53Provider::from_config(&config.dns).context("building Route 53 client")?;

    let provisioner: Option<Box<dyn DomainProvisioner>> = if config.provisioning.enabled {
        let heroku = HerokuProvisioner::from_config(&config.provisioning)
            .context("building Heroku client")?;
        info!("Provisioning enabled via heroku");
        Some(Box::new(heroku))
    } else {
        info!("Provisioning disabled; missing records are only reported");
        None
    };

    let sink = build_log_sink(config)?;
    info!("Forwarding log lines to {} sink", sink.sink_name());

    Ok(Reconciler::new(
        config.reconciler(),
        Box::new(dns),
        provisioner,
        sink,
    )?)
}

/// Datadog when an API key is configured, otherwise a sink that drops lines
fn build_log_sink(config: &ZonewardenConfig) -> Result<Arc<dyn LogSink>> {
    let sink: Arc<dyn LogSink> = match DatadogLogSink::from_config(&config.log_sink)
        .context("building Datadog log sink")?
    {
        Some(datadog) => Arc::new(datadog),
        None => Arc::new(NullLogSink),
    };
    Ok(sink)
}
