//! Shared fixtures and helpers for provisioning BDD scenarios.

use std::time::Duration;

use rstest::fixture;
use serde_json::Value;
use vultr_provision::test_support::ScriptedTransport;
use vultr_provision::{
    Instance, InstanceRequest, PollPolicy, Provisioner, Request, VultrClient, VultrError,
};

#[derive(Clone, Debug)]
pub enum ProvisionOutcome {
    Ready(Box<Instance>),
    Failed(VultrError),
}

#[derive(Clone, Debug)]
pub struct ProvisionContext {
    pub transport: ScriptedTransport,
    pub outcome: Option<ProvisionOutcome>,
}

#[fixture]
pub fn provision_context() -> ProvisionContext {
    ProvisionContext {
        transport: ScriptedTransport::new(),
        outcome: None,
    }
}

pub fn provisioner(transport: &ScriptedTransport) -> Provisioner<ScriptedTransport> {
    Provisioner::new(VultrClient::new(transport.clone())).with_poll_policy(PollPolicy::new(
        Duration::from_millis(1),
        Duration::from_secs(5),
        10,
    ))
}

pub fn request(label: &str, ssh_key_name: &str) -> InstanceRequest {
    InstanceRequest::builder()
        .label(label)
        .ssh_key_name(ssh_key_name)
        .build()
        .unwrap_or_else(|err| panic!("instance request should be valid: {err}"))
}

/// Body of the single `POST /instances` request, if one was sent.
pub fn creation_body(transport: &ScriptedTransport) -> Option<Value> {
    transport
        .requests()
        .into_iter()
        .find(|sent: &Request| sent.path == "/instances")
        .and_then(|sent| sent.body)
}
