// # zonewarden-core
//
// Core library for zonewarden, a single-invocation DNS record reconciler.
//
// ## Architecture Overview
//
// This library provides the decision logic and the client interfaces:
// - **DnsProvider**: Trait for hosted-zone lookups and record creation
// - **DomainProvisioner**: Trait for registering custom domains on a PaaS
// - **LogSink**: Trait for best-effort forwarding of log lines
// - **Reconciler**: Checks a record and, when enabled, provisions it
// - **ZonewardenConfig**: Explicit configuration loaded per invocation
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic lives here; API adapters live
//    in their own crates
// 2. **Explicit Configuration**: No globals; everything is passed to constructors
// 3. **Single Shot**: Every external call is made at most once, never retried
// 4. **Library-First**: The binary is a thin wiring layer over this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{ReconcilerConfig, ZonewardenConfig};
pub use engine::{InvocationResponse, ReconcileOutcome, Reconciler, ReconciliationRequest};
pub use error::{Error, Result};
pub use traits::{DnsProvider, DomainProvisioner, LogLevel, LogSink};
