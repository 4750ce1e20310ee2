//! BDD scenarios for instance provisioning.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ProvisionContext, provision_context};

#[scenario(
    path = "tests/features/provision.feature",
    name = "Resolve selectors, create the instance, and wait until it runs"
)]
fn scenario_provision_until_running(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "Unknown selectors are sent as null"
)]
fn scenario_unknown_selectors_sent_as_null(provision_context: ProvisionContext) {
    let _ = provision_context;
}

#[scenario(
    path = "tests/features/provision.feature",
    name = "A rejected API key surfaces the response body"
)]
fn scenario_rejected_key(provision_context: ProvisionContext) {
    let _ = provision_context;
}
