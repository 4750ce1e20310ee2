//! Core library for the `vultr-provision` tool.
//!
//! The crate wraps the Vultr v2 API behind a [`Transport`] seam, resolves
//! human-readable selectors (city, OS name, SSH key name) into provider
//! identifiers, and drives the create → wait-until-ready workflow through
//! [`Provisioner`].

pub mod config;
pub mod error;
pub mod provision;
#[cfg(test)]
mod test_helpers;
pub mod test_support;
pub mod transport;
pub mod vultr;

pub use config::{ConfigError, VultrConfig};
pub use error::VultrError;
pub use provision::{
    InstanceRequest, InstanceRequestBuilder, PollPolicy, Provisioner, ReadinessTarget,
};
pub use transport::{Credential, HttpTransport, RawResponse, Request, Transport};
pub use vultr::{
    Account, Instance, InstanceEnvelope, InstanceSpec, OperatingSystem, Plan, Region, ResourceId,
    SshKey, VultrClient,
};
