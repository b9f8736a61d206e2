//! Reconciliation handler
//!
//! The Reconciler is responsible for one invocation:
//! - Checking whether the requested CNAME exists in the hosted zone
//! - Optionally provisioning a custom domain and creating the record
//! - Logging the outcome of every branch, locally and to the log sink
//! - Mapping the outcome onto the invocation response
//!
//! ## Flow
//!
//! ```text
//!   ReconciliationRequest
//!            │
//!            ▼
//!   ┌─────────────────┐   lookup (start key, max 1)   ┌─────────────┐
//!   │   Reconciler    │ ─────────────────────────────▶│ DnsProvider │
//!   └─────────────────┘                               └─────────────┘
//!            │ absent + provisioner configured
//!            ▼
//!   ┌───────────────────┐  cname   ┌─────────────┐
//!   │ DomainProvisioner │ ───────▶ │ DnsProvider │ create
//!   └───────────────────┘          └─────────────┘
//! ```
//!
//! Nothing is retried. Every external call is made at most once per invocation.

mod response;

pub use response::{InvocationResponse, ReconcileOutcome, ReconciliationRequest};

use crate::config::ReconcilerConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsRecord, DomainProvisioner, LogLevel, LogSink, RecordType};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Records fetched per existence check
const LOOKUP_MAX_ITEMS: u32 = 1;

/// Reconciliation handler
///
/// Built fresh for each invocation from explicit configuration and client
/// adapters; holds no state between invocations.
///
/// The create path is enabled by passing a [`DomainProvisioner`]. Without one,
/// a missing record is reported as [`ReconcileOutcome::NotFound`] and nothing
/// is written.
pub struct Reconciler {
    /// Zone, TTL and provisioning parameters
    config: ReconcilerConfig,

    /// DNS provider for lookups and record creation
    dns: Box<dyn DnsProvider>,

    /// Custom-domain provisioner; `None` disables the create path
    provisioner: Option<Box<dyn DomainProvisioner>>,

    /// External log sink
    sink: Arc<dyn LogSink>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `config`: Reconciler settings
    /// - `dns`: DNS provider implementation
    /// - `provisioner`: Custom-domain provisioner, or `None` to only check
    /// - `sink`: Log sink receiving every outcome line
    pub fn new(
        config: ReconcilerConfig,
        dns: Box<dyn DnsProvider>,
        provisioner: Option<Box<dyn DomainProvisioner>>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            dns,
            provisioner,
            sink,
        })
    }

    /// Whether missing records are provisioned and created
    pub fn provisioning_enabled(&self) -> bool {
        self.provisioner.is_some()
    }

    /// Handle one invocation and build its response
    ///
    /// Errors never escape: they are logged and returned as a 500 response
    /// whose body embeds the error message.
    pub async fn handle(&self, request: &ReconciliationRequest) -> InvocationResponse {
        let record_name = request.record.trim();
        match self.reconcile(record_name).await {
            Ok(outcome) => {
                debug!(
                    "Reconciled {}: {} (record present: {})",
                    record_name,
                    outcome.status(),
                    outcome.exists()
                );
                InvocationResponse::from_outcome(&outcome, record_name)
            }
            Err(e) => {
                let message = format!("An error occurred: {e}");
                self.emit(LogLevel::Error, &message).await;
                InvocationResponse::error(&message)
            }
        }
    }

    /// Reconcile a single record name
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: What was found or done
    /// - `Err(Error)`: Invalid input, or a failure that cannot be expressed
    ///   as an outcome (e.g. the record create call failed)
    pub async fn reconcile(&self, record_name: &str) -> Result<ReconcileOutcome> {
        let record_name = record_name.trim();
        if record_name.is_empty() {
            return Err(Error::invalid_input("record name cannot be empty"));
        }

        debug!(
            "Reconciling {} in zone {} via {}",
            record_name,
            self.config.zone_id,
            self.dns.provider_name()
        );

        if self.record_exists(record_name, &RecordType::Cname).await? {
            let outcome = ReconcileOutcome::AlreadyExists;
            self.emit(LogLevel::Info, &outcome.message(record_name)).await;
            return Ok(outcome);
        }

        let Some(provisioner) = self.provisioner.as_deref() else {
            let outcome = ReconcileOutcome::NotFound;
            self.emit(LogLevel::Info, &outcome.message(record_name)).await;
            return Ok(outcome);
        };

        let Some(cname) = self.provision(provisioner, record_name).await else {
            let outcome = ReconcileOutcome::ProvisioningSkipped;
            self.emit(LogLevel::Info, &outcome.message(record_name)).await;
            return Ok(outcome);
        };

        self.add_cname_record(record_name, &cname).await
    }

    /// Check whether `(record_name, record_type)` is present in the zone
    ///
    /// Error responses from the provider API are logged at error level and
    /// reported as "absent". Transport failures and local errors propagate.
    pub async fn record_exists(&self, record_name: &str, record_type: &RecordType) -> Result<bool> {
        let records = match self
            .dns
            .lookup(&self.config.zone_id, record_name, record_type, LOOKUP_MAX_ITEMS)
            .await
        {
            Ok(records) => records,
            Err(e) if e.is_provider_side() => {
                let message = format!("Error checking for record in DNS provider: {e}");
                self.emit(LogLevel::Error, &message).await;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        debug!("Lookup for {} returned {} record(s)", record_name, records.len());

        Ok(records
            .first()
            .is_some_and(|record| record.matches(record_name, record_type)))
    }

    /// Register the custom domain and return the assigned CNAME target
    async fn provision(
        &self,
        provisioner: &dyn DomainProvisioner,
        record_name: &str,
    ) -> Option<String> {
        let hostname = self
            .config
            .target_hostname
            .as_deref()
            .unwrap_or(record_name);

        match provisioner
            .create_custom_domain(hostname, self.config.certificate_ref.as_deref())
            .await
        {
            Ok(result) => {
                self.emit(LogLevel::Info, &format!("Custom domain CNAME: {}", result.cname))
                    .await;
                Some(result.cname)
            }
            Err(e) => {
                debug!("Provisioner {} failed", provisioner.provisioner_name());
                let message = format!("Error provisioning custom domain: {e}");
                self.emit(LogLevel::Error, &message).await;
                None
            }
        }
    }

    /// Create the CNAME record pointing `record_name` at `cname`
    async fn add_cname_record(&self, record_name: &str, cname: &str) -> Result<ReconcileOutcome> {
        let record = DnsRecord::cname(record_name, cname, self.config.record_ttl);

        match self.dns.create(&self.config.zone_id, &record).await {
            Ok(()) => {
                let outcome = ReconcileOutcome::Created {
                    cname: cname.to_string(),
                };
                self.emit(LogLevel::Info, &outcome.message(record_name)).await;
                Ok(outcome)
            }
            Err(e @ Error::AlreadyExists(_)) => {
                let message = format!("Error creating CNAME record: record already exists. {e}");
                self.emit(LogLevel::Error, &message).await;
                Ok(ReconcileOutcome::AlreadyExists)
            }
            Err(e) => {
                let message = format!("Error creating CNAME record: {e}");
                self.emit(LogLevel::Error, &message).await;
                Err(e)
            }
        }
    }

    /// Log locally and forward to the sink
    async fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!("{}", message),
            LogLevel::Error => error!("{}", message),
        }
        self.sink.log(message, level).await;
    }
}
