// # Domain Provisioner Trait
//
// Defines the interface for registering a custom domain with a PaaS and
// obtaining the CNAME target the platform assigns to it.
//
// ## Implementations
//
// - Heroku: `zonewarden-heroku` crate

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a successful custom-domain registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    /// DNS target the new record must point at
    pub cname: String,
}

/// Trait for custom-domain provisioning implementations
///
/// Like [`crate::traits::DnsProvider`], provisioners make exactly one API
/// call per invocation and never retry.
#[async_trait]
pub trait DomainProvisioner: Send + Sync {
    /// Register `hostname` as a custom domain
    ///
    /// # Parameters
    ///
    /// - `hostname`: The hostname to attach to the application
    /// - `certificate_ref`: Optional certificate (SNI endpoint) to bind
    ///
    /// # Returns
    ///
    /// - `Ok(ProvisioningResult)`: The CNAME target assigned by the platform
    /// - `Err(Error::Provisioning)`: The platform rejected the request; the
    ///   message carries the response body
    async fn create_custom_domain(
        &self,
        hostname: &str,
        certificate_ref: Option<&str>,
    ) -> Result<ProvisioningResult, crate::Error>;

    /// Get the provisioner name (for logging/debugging)
    fn provisioner_name(&self) -> &'static str;
}
