//! Test doubles and common utilities for reconciliation contract tests
//!
//! These doubles count calls and record arguments so tests can assert which
//! external calls a reconciliation made, without any network access.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use zonewarden_core::error::{Error, Result};
use zonewarden_core::traits::{
    DnsProvider, DnsRecord, DomainProvisioner, LogLevel, LogSink, ProvisioningResult, RecordType,
};
use zonewarden_core::{Reconciler, ReconcilerConfig};

/// Zone id used by every contract test
pub const ZONE_ID: &str = "Z0TESTZONE";

/// How the mock answers a lookup
#[derive(Clone)]
pub enum LookupBehavior {
    /// Return these records
    Records(Vec<DnsRecord>),
    /// Fail with a provider-side error
    ProviderError(String),
    /// Fail with a local (non-provider) error
    LocalError(String),
    /// Fail before any response arrives (connect error, timeout)
    TransportError(String),
}

/// How the mock answers a create
#[derive(Clone, Copy)]
pub enum CreateBehavior {
    Succeed,
    AlreadyExists,
    ProviderError,
}

/// A mock DnsProvider that tracks calls
pub struct MockDnsProvider {
    lookup: LookupBehavior,
    create: CreateBehavior,
    lookup_call_count: Arc<AtomicUsize>,
    create_call_count: Arc<AtomicUsize>,
    lookups: Arc<Mutex<Vec<(String, String, RecordType, u32)>>>,
    created_records: Arc<Mutex<Vec<DnsRecord>>>,
}

impl MockDnsProvider {
    pub fn new(lookup: LookupBehavior, create: CreateBehavior) -> Self {
        Self {
            lookup,
            create,
            lookup_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            lookups: Arc::new(Mutex::new(Vec::new())),
            created_records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose lookup returns `records` and whose create succeeds
    pub fn returning(records: Vec<DnsRecord>) -> Self {
        Self::new(LookupBehavior::Records(records), CreateBehavior::Succeed)
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            lookup: other.lookup.clone(),
            create: other.create,
            lookup_call_count: Arc::clone(&other.lookup_call_count),
            create_call_count: Arc::clone(&other.create_call_count),
            lookups: Arc::clone(&other.lookups),
            created_records: Arc::clone(&other.created_records),
        }
    }

    pub fn lookup_call_count(&self) -> usize {
        self.lookup_call_count.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// Arguments of every lookup: (zone, name, type, max_items)
    pub fn lookups(&self) -> Vec<(String, String, RecordType, u32)> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn created_records(&self) -> Vec<DnsRecord> {
        self.created_records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn lookup(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &RecordType,
        max_items: u32,
    ) -> Result<Vec<DnsRecord>> {
        self.lookup_call_count.fetch_add(1, Ordering::SeqCst);
        self.lookups.lock().unwrap().push((
            zone_id.to_string(),
            record_name.to_string(),
            record_type.clone(),
            max_items,
        ));

        match &self.lookup {
            LookupBehavior::Records(records) => Ok(records.clone()),
            LookupBehavior::ProviderError(msg) => Err(Error::provider("mock", msg.clone())),
            LookupBehavior::LocalError(msg) => Err(Error::invalid_input(msg.clone())),
            LookupBehavior::TransportError(msg) => Err(Error::http(msg.clone())),
        }
    }

    async fn create(&self, _zone_id: &str, record: &DnsRecord) -> Result<()> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.created_records.lock().unwrap().push(record.clone());

        match self.create {
            CreateBehavior::Succeed => Ok(()),
            CreateBehavior::AlreadyExists => Err(Error::already_exists(format!(
                "Tried to create resource record set {} but it already exists",
                record.name
            ))),
            CreateBehavior::ProviderError => {
                Err(Error::provider("mock", "Throttling: Rate exceeded"))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A mock DomainProvisioner that tracks calls
pub struct MockProvisioner {
    result: std::result::Result<String, String>,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl MockProvisioner {
    pub fn succeeding(cname: &str) -> Self {
        Self::with_result(Ok(cname.to_string()))
    }

    pub fn failing(body: &str) -> Self {
        Self::with_result(Err(body.to_string()))
    }

    fn with_result(result: std::result::Result<String, String>) -> Self {
        Self {
            result,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            result: other.result.clone(),
            call_count: Arc::clone(&other.call_count),
            requests: Arc::clone(&other.requests),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// (hostname, certificate_ref) of every call
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DomainProvisioner for MockProvisioner {
    async fn create_custom_domain(
        &self,
        hostname: &str,
        certificate_ref: Option<&str>,
    ) -> Result<ProvisioningResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((hostname.to_string(), certificate_ref.map(str::to_string)));

        match &self.result {
            Ok(cname) => Ok(ProvisioningResult {
                cname: cname.clone(),
            }),
            Err(body) => Err(Error::provisioning(body.clone())),
        }
    }

    fn provisioner_name(&self) -> &'static str {
        "mock"
    }
}

/// A LogSink that keeps every line in memory
#[derive(Default)]
pub struct RecordingLogSink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines_at(LogLevel::Error)
    }

    pub fn infos(&self) -> Vec<String> {
        self.lines_at(LogLevel::Info)
    }

    fn lines_at(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

#[async_trait::async_trait]
impl LogSink for RecordingLogSink {
    async fn log(&self, message: &str, level: LogLevel) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }

    fn sink_name(&self) -> &'static str {
        "recording"
    }
}

/// A CNAME record as Route 53 reports it (fully qualified, trailing dot)
pub fn cname_record(name: &str, target: &str) -> DnsRecord {
    DnsRecord::cname(name, target, 300)
}

/// Build a reconciler over shared doubles
pub fn reconciler(
    dns: &MockDnsProvider,
    provisioner: Option<&MockProvisioner>,
    sink: &Arc<RecordingLogSink>,
) -> Reconciler {
    reconciler_with_config(ReconcilerConfig::new(ZONE_ID), dns, provisioner, sink)
}

/// Build a reconciler over shared doubles with explicit settings
pub fn reconciler_with_config(
    config: ReconcilerConfig,
    dns: &MockDnsProvider,
    provisioner: Option<&MockProvisioner>,
    sink: &Arc<RecordingLogSink>,
) -> Reconciler {
    Reconciler::new(
        config,
        Box::new(MockDnsProvider::sharing_counters_with(dns)),
        provisioner.map(|p| {
            Box::new(MockProvisioner::sharing_counters_with(p)) as Box<dyn DomainProvisioner>
        }),
        Arc::clone(sink) as Arc<dyn LogSink>,
    )
    .expect("reconciler construction succeeds")
}
