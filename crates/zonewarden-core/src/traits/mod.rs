//! Core traits for zonewarden
//!
//! This module defines the abstract interfaces that all client adapters must follow.
//!
//! - [`DnsProvider`]: Look up and create records in a hosted zone
//! - [`DomainProvisioner`]: Register custom domains with a PaaS
//! - [`LogSink`]: Forward structured log lines to an external service

pub mod dns_provider;
pub mod domain_provisioner;
pub mod log_sink;

pub use dns_provider::{DnsProvider, DnsRecord, RecordType, normalize_name};
pub use domain_provisioner::{DomainProvisioner, ProvisioningResult};
pub use log_sink::{LogContext, LogEvent, LogLevel, LogSink, NullLogSink};
