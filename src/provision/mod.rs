//! Instance provisioning: resolve selectors, submit, wait for readiness.

mod wait;

use std::future::{Future, pending};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::VultrError;
use crate::transport::Transport;
use crate::vultr::{Instance, InstanceSpec, ResourceId, VultrClient};

pub use wait::ReadinessTarget;

/// City used when the caller does not pick one.
pub const DEFAULT_CITY: &str = "Paris";
/// Plan used when the caller does not pick one.
pub const DEFAULT_PLAN: &str = "vc2-1c-1gb";
/// Operating system used when the caller does not pick one.
pub const DEFAULT_OS: &str = "Debian 11 x64 (bullseye)";

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const WAIT_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_POLL_ATTEMPTS: u32 = 600;

/// Parameters required to create a new instance, expressed with
/// human-readable selectors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceRequest {
    /// Label given to the new instance.
    pub label: String,
    /// Name of the SSH key installed on first boot.
    pub ssh_key_name: String,
    /// City of the target region (for example `Paris`).
    pub city: String,
    /// Plan identifier (for example `vc2-1c-1gb`).
    pub plan_id: String,
    /// Operating system display name.
    pub os_name: String,
}

impl InstanceRequest {
    /// Starts a builder pre-populated with the default city, plan, and OS.
    #[must_use]
    pub fn builder() -> InstanceRequestBuilder {
        InstanceRequestBuilder::new()
    }

    /// Validates the request, returning a descriptive error when a required
    /// field is missing.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError::Validation`] when any field is empty.
    pub fn validate(&self) -> Result<(), VultrError> {
        let fields = [
            ("label", &self.label),
            ("ssh_key_name", &self.ssh_key_name),
            ("city", &self.city),
            ("plan_id", &self.plan_id),
            ("os_name", &self.os_name),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(VultrError::Validation(format!("missing or empty field: {name}")));
            }
        }
        Ok(())
    }
}

/// Builder for [`InstanceRequest`] that trims inputs and validates on build.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceRequestBuilder {
    label: String,
    ssh_key_name: String,
    city: String,
    plan_id: String,
    os_name: String,
}

impl Default for InstanceRequestBuilder {
    fn default() -> Self {
        Self {
            label: String::new(),
            ssh_key_name: String::new(),
            city: DEFAULT_CITY.to_owned(),
            plan_id: DEFAULT_PLAN.to_owned(),
            os_name: DEFAULT_OS.to_owned(),
        }
    }
}

impl InstanceRequestBuilder {
    /// Creates a builder with the default city, plan, and OS.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the instance label.
    #[must_use]
    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = value.into();
        self
    }

    /// Sets the SSH key name.
    #[must_use]
    pub fn ssh_key_name(mut self, value: impl Into<String>) -> Self {
        self.ssh_key_name = value.into();
        self
    }

    /// Sets the region city.
    #[must_use]
    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.city = value.into();
        self
    }

    /// Sets the plan identifier.
    #[must_use]
    pub fn plan_id(mut self, value: impl Into<String>) -> Self {
        self.plan_id = value.into();
        self
    }

    /// Sets the operating system name.
    #[must_use]
    pub fn os_name(mut self, value: impl Into<String>) -> Self {
        self.os_name = value.into();
        self
    }

    /// Builds and validates the [`InstanceRequest`], trimming string inputs.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError::Validation`] when any field is empty.
    pub fn build(self) -> Result<InstanceRequest, VultrError> {
        let request = InstanceRequest {
            label: self.label.trim().to_owned(),
            ssh_key_name: self.ssh_key_name.trim().to_owned(),
            city: self.city.trim().to_owned(),
            plan_id: self.plan_id.trim().to_owned(),
            os_name: self.os_name.trim().to_owned(),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Bounds for the readiness poll loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollPolicy {
    /// Fixed delay between status polls.
    pub interval: Duration,
    /// Wall-clock budget for the whole wait.
    pub timeout: Duration,
    /// Maximum number of status polls.
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Creates a policy from its parts.
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            timeout,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(POLL_INTERVAL, WAIT_TIMEOUT, MAX_POLL_ATTEMPTS)
    }
}

/// Runs the create-then-wait workflow against a [`VultrClient`].
#[derive(Clone, Debug)]
pub struct Provisioner<T> {
    client: VultrClient<T>,
    policy: PollPolicy,
    target: ReadinessTarget,
}

impl<T: Transport> Provisioner<T> {
    /// Creates a provisioner with the default poll policy and readiness
    /// target.
    #[must_use]
    pub fn new(client: VultrClient<T>) -> Self {
        Self {
            client,
            policy: PollPolicy::default(),
            target: ReadinessTarget::default(),
        }
    }

    /// Overrides the poll policy.
    #[must_use]
    pub const fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the readiness target.
    #[must_use]
    pub fn with_target(mut self, target: ReadinessTarget) -> Self {
        self.target = target;
        self
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn client(&self) -> &VultrClient<T> {
        &self.client
    }

    /// Resolves the request's selectors into an [`InstanceSpec`].
    ///
    /// Lookups run one after another: region, OS, then SSH key. A selector
    /// that matches nothing is logged and left as `null`; the API's own
    /// validation reports it on submission.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when any list endpoint fails.
    pub async fn build_spec(&self, request: &InstanceRequest) -> Result<InstanceSpec, VultrError> {
        request.validate()?;
        let region = self.client.resolve_region(&request.city).await?;
        warn_unresolved(region.as_ref(), "region", &request.city);
        let os_id = self.client.resolve_os(&request.os_name).await?;
        warn_unresolved(os_id.as_ref(), "os", &request.os_name);
        let ssh_key = self.client.resolve_ssh_key(&request.ssh_key_name).await?;
        warn_unresolved(ssh_key.as_ref(), "ssh_key", &request.ssh_key_name);

        Ok(InstanceSpec {
            region,
            plan: request.plan_id.clone(),
            label: request.label.clone(),
            os_id,
            sshkey_id: vec![ssh_key],
        })
    }

    /// Resolves selectors and submits the creation request, returning the
    /// pending instance without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when resolution or submission fails.
    pub async fn submit(&self, request: &InstanceRequest) -> Result<Instance, VultrError> {
        let spec = self.build_spec(request).await?;
        let instance = self.client.create_instance(&spec).await?;
        info!(
            instance_id = %instance.id,
            label = %instance.label,
            plan = %spec.plan,
            "instance creation accepted"
        );
        Ok(instance)
    }

    /// Creates an instance and waits until it is ready.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when submission fails, a poll fails, or the
    /// instance does not converge within the poll policy.
    pub async fn create_instance(&self, request: &InstanceRequest) -> Result<Instance, VultrError> {
        self.create_instance_until(request, pending()).await
    }

    /// Creates an instance and waits until it is ready or `cancel`
    /// completes, whichever happens first.
    ///
    /// # Errors
    ///
    /// As [`Self::create_instance`], plus [`VultrError::Cancelled`] when the
    /// cancellation future resolves during the wait.
    pub async fn create_instance_until<C>(
        &self,
        request: &InstanceRequest,
        cancel: C,
    ) -> Result<Instance, VultrError>
    where
        C: Future<Output = ()>,
    {
        let instance = self.submit(request).await?;
        self.wait_for_ready(instance, cancel).await
    }
}

fn warn_unresolved(id: Option<&ResourceId>, kind: &str, selector: &str) {
    if id.is_none() {
        warn!(kind, selector, "selector did not match any resource; sending null");
    }
}

#[cfg(test)]
mod tests;
