//! Typed client for the subset of the Vultr v2 API used for provisioning.
//!
//! Every operation is a single round trip through the [`Transport`]; list
//! results are never cached, so repeated calls hit the API again.

mod resolve;
mod types;

use crate::error::VultrError;
use crate::transport::{
    Request, STATUS_ACCEPTED, STATUS_NO_CONTENT, STATUS_OK, Transport, decode_response,
    expect_status,
};

pub use resolve::{Labelled, first_match};
pub use types::{
    Account, Instance, InstanceEnvelope, InstanceSpec, OperatingSystem, Plan, Region, ResourceId,
    SshKey,
};

use types::{AccountEnvelope, OsList, PlanList, RegionList, SshKeyList};

/// Plan filter that lists every plan family.
pub const PLAN_TYPE_ALL: &str = "all";

/// Client exposing the Vultr endpoints as typed operations.
#[derive(Clone, Debug)]
pub struct VultrClient<T> {
    transport: T,
}

impl<T: Transport> VultrClient<T> {
    /// Wraps a transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch<R: serde::de::DeserializeOwned>(
        &self,
        request: Request,
        accepted: &[u16],
    ) -> Result<R, VultrError> {
        let response = self.transport.send(request).await?;
        decode_response(response, accepted)
    }

    /// Probes `GET /account` to check the credential.
    ///
    /// The outcome is returned rather than logged; callers decide whether a
    /// failed probe matters.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] when the request fails or the API rejects the
    /// credential.
    pub async fn auth(&self) -> Result<Account, VultrError> {
        let envelope: AccountEnvelope = self.fetch(Request::get("/account"), STATUS_OK).await?;
        Ok(envelope.account)
    }

    /// Lists plans of the given type (`all`, `vc2`, `vhf`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] on transport, status, or decode failures.
    pub async fn list_plans(&self, plan_type: &str) -> Result<Vec<Plan>, VultrError> {
        let list: PlanList = self
            .fetch(Request::get("/plans").query("type", plan_type), STATUS_OK)
            .await?;
        Ok(list.plans)
    }

    /// Lists every region.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] on transport, status, or decode failures.
    pub async fn list_regions(&self) -> Result<Vec<Region>, VultrError> {
        let list: RegionList = self.fetch(Request::get("/regions"), STATUS_OK).await?;
        Ok(list.regions)
    }

    /// Lists every operating system image.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] on transport, status, or decode failures.
    pub async fn list_os(&self) -> Result<Vec<OperatingSystem>, VultrError> {
        let list: OsList = self.fetch(Request::get("/os"), STATUS_OK).await?;
        Ok(list.os)
    }

    /// Lists the SSH keys registered on the account.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] on transport, status, or decode failures.
    pub async fn list_ssh_keys(&self) -> Result<Vec<SshKey>, VultrError> {
        let list: SshKeyList = self.fetch(Request::get("/ssh-keys"), STATUS_OK).await?;
        Ok(list.ssh_keys)
    }

    /// Submits an instance creation request. The API answers `202 Accepted`
    /// with the pending instance record.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError::Remote`] for any status other than 202, and
    /// other [`VultrError`] variants on transport or decode failures.
    pub async fn create_instance(&self, spec: &InstanceSpec) -> Result<Instance, VultrError> {
        let body = serde_json::to_value(spec).map_err(VultrError::decode)?;
        let envelope: InstanceEnvelope = self
            .fetch(Request::post("/instances", body), STATUS_ACCEPTED)
            .await?;
        Ok(envelope.instance)
    }

    /// Fetches the current snapshot of an instance.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError`] on transport, status, or decode failures.
    pub async fn get_instance(&self, instance_id: &str) -> Result<Instance, VultrError> {
        let envelope: InstanceEnvelope = self
            .fetch(Request::get(format!("/instances/{instance_id}")), STATUS_OK)
            .await?;
        Ok(envelope.instance)
    }

    /// Deletes an instance. The API answers `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns [`VultrError::Remote`] for any other status.
    pub async fn delete_instance(&self, instance_id: &str) -> Result<(), VultrError> {
        let response = self
            .transport
            .send(Request::delete(format!("/instances/{instance_id}")))
            .await?;
        expect_status(response, STATUS_NO_CONTENT).map(drop)
    }
}
