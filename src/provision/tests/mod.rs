//! Unit tests for request building and instance submission.

use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;

use super::{InstanceRequest, PollPolicy, Provisioner, DEFAULT_CITY, DEFAULT_OS, DEFAULT_PLAN};
use crate::error::VultrError;
use crate::test_support::{
    ScriptedTransport, instance_body, os_body, regions_body, ssh_keys_body,
};
use crate::vultr::{ResourceId, VultrClient};


#[fixture]
fn transport() -> ScriptedTransport {
    ScriptedTransport::new()
}

fn provisioner(transport: &ScriptedTransport) -> Provisioner<ScriptedTransport> {
    Provisioner::new(VultrClient::new(transport.clone())).with_poll_policy(PollPolicy::new(
        Duration::from_millis(1),
        Duration::from_secs(5),
        20,
    ))
}

fn web_request() -> InstanceRequest {
    InstanceRequest::builder()
        .label("web-1")
        .ssh_key_name("laptop")
        .build()
        .unwrap_or_else(|err| panic!("request should be valid: {err}"))
}

/// Queues the three catalogue listings with every default selector present.
fn push_catalogue(transport: &ScriptedTransport) {
    transport.push_json(
        200,
        &regions_body(&[(json!(1), "Paris"), (json!(2), "Lyon")]),
    );
    transport.push_json(
        200,
        &os_body(&[(json!(4), "Ubuntu 22.04 LTS x64"), (json!(5), DEFAULT_OS)]),
    );
    transport.push_json(200, &ssh_keys_body(&[(json!("abc123"), "laptop")]));
}

#[test]
fn builder_applies_defaults() {
    let request = web_request();
    assert_eq!(request.city, DEFAULT_CITY);
    assert_eq!(request.plan_id, DEFAULT_PLAN);
    assert_eq!(request.os_name, DEFAULT_OS);
}

#[test]
fn builder_trims_inputs() {
    let request = InstanceRequest::builder()
        .label("  web-1 ")
        .ssh_key_name(" laptop")
        .city("Lyon ")
        .build()
        .unwrap_or_else(|err| panic!("request should be valid: {err}"));
    assert_eq!(request.label, "web-1");
    assert_eq!(request.ssh_key_name, "laptop");
    assert_eq!(request.city, "Lyon");
}

#[rstest]
#[case::label("", "laptop", "label")]
#[case::ssh_key("web-1", "   ", "ssh_key_name")]
fn builder_rejects_empty_fields(#[case] label: &str, #[case] key: &str, #[case] field: &str) {
    let err = InstanceRequest::builder()
        .label(label)
        .ssh_key_name(key)
        .build()
        .expect_err("empty field should be rejected");
    assert!(
        matches!(err, VultrError::Validation(ref message) if message.contains(field)),
        "unexpected error: {err}"
    );
}

#[rstest]
#[tokio::test]
async fn build_spec_resolves_selectors_in_order(transport: ScriptedTransport) {
    push_catalogue(&transport);
    let spec = provisioner(&transport)
        .build_spec(&web_request())
        .await
        .unwrap_or_else(|err| panic!("spec should resolve: {err}"));

    assert_eq!(spec.region, Some(ResourceId::Numeric(1)));
    assert_eq!(spec.os_id, Some(ResourceId::Numeric(5)));
    assert_eq!(spec.sshkey_id, vec![Some(ResourceId::from("abc123"))]);
    assert_eq!(transport.paths(), vec!["/regions", "/os", "/ssh-keys"]);
}

#[rstest]
#[tokio::test]
async fn submit_posts_resolved_identifiers(transport: ScriptedTransport) {
    push_catalogue(&transport);
    transport.push_json(202, &instance_body("inst-1", "pending", "none", "stopped"));

    let instance = provisioner(&transport)
        .submit(&web_request())
        .await
        .unwrap_or_else(|err| panic!("submission should be accepted: {err}"));

    assert_eq!(instance.id, "inst-1");
    let requests = transport.requests();
    let Some(post) = requests.last() else {
        panic!("requests should be recorded");
    };
    assert_eq!(post.path, "/instances");
    assert_eq!(
        post.body,
        Some(json!({
            "region": 1,
            "plan": "vc2-1c-1gb",
            "label": "web-1",
            "os_id": 5,
            "sshkey_id": ["abc123"]
        }))
    );
}

#[rstest]
#[tokio::test]
async fn unresolved_selectors_are_sent_as_null(transport: ScriptedTransport) {
    transport.push_json(200, &regions_body(&[(json!(2), "Lyon")]));
    transport.push_json(200, &os_body(&[]));
    transport.push_json(200, &ssh_keys_body(&[]));
    transport.push_response(400, r#"{"error":"Invalid region.","status":400}"#);

    let err = provisioner(&transport)
        .submit(&web_request())
        .await
        .expect_err("provider should reject the request");

    assert_eq!(
        err,
        VultrError::Remote {
            status: 400,
            body: String::from(r#"{"error":"Invalid region.","status":400}"#),
        }
    );
    let requests = transport.requests();
    let body = requests.last().and_then(|request| request.body.clone());
    assert_eq!(
        body,
        Some(json!({
            "region": null,
            "plan": "vc2-1c-1gb",
            "label": "web-1",
            "os_id": null,
            "sshkey_id": [null]
        }))
    );
}

#[rstest]
#[tokio::test]
async fn resolution_failure_aborts_before_submission(transport: ScriptedTransport) {
    transport.push_json(200, &regions_body(&[(json!(1), "Paris")]));
    transport.push_response(500, "boom");

    let err = provisioner(&transport)
        .create_instance(&web_request())
        .await
        .expect_err("os listing failure should abort");

    assert_eq!(
        err,
        VultrError::Remote {
            status: 500,
            body: String::from("boom"),
        }
    );
    assert_eq!(transport.paths(), vec!["/regions", "/os"]);
}

#[rstest]
#[tokio::test]
async fn create_instance_returns_converged_record(transport: ScriptedTransport) {
    push_catalogue(&transport);
    transport.push_json(202, &instance_body("inst-1", "pending", "none", "stopped"));
    transport.push_json(200, &instance_body("inst-1", "active", "none", "running"));
    transport.push_json(200, &instance_body("inst-1", "active", "installingbooting", "running"));

    let instance = provisioner(&transport)
        .create_instance(&web_request())
        .await
        .unwrap_or_else(|err| panic!("instance should converge: {err}"));

    assert_eq!(instance.status, "active");
    assert_eq!(instance.server_status, "installingbooting");
    assert_eq!(instance.power_status, "running");
    assert_eq!(transport.remaining(), 0);
}
