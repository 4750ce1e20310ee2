//! Typed records for the Vultr resources the client reads and writes.
//!
//! Required fields are plain (non-`Option`) so a record missing its
//! identifier, label, or status fields fails to decode instead of flowing on
//! as a half-populated value.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider identifier. Vultr uses strings for regions and SSH keys and
/// integers for operating systems; the original JSON form is kept so the
/// identifier serialises back unchanged.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// Integer identifier, for example an OS id.
    Numeric(u64),
    /// String identifier, for example `cdg` or an SSH key UUID.
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A datacenter location.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier.
    pub id: ResourceId,
    /// City name used as the selector label.
    pub city: String,
    /// ISO country code.
    #[serde(default)]
    pub country: String,
    /// Continent name.
    #[serde(default)]
    pub continent: String,
    /// Feature flags such as `ddos_protection`.
    #[serde(default)]
    pub options: Vec<String>,
}

/// An installable operating system image.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OperatingSystem {
    /// OS identifier.
    pub id: ResourceId,
    /// Display name used as the selector label.
    pub name: String,
    /// CPU architecture.
    #[serde(default)]
    pub arch: String,
    /// OS family, for example `debian`.
    #[serde(default)]
    pub family: String,
}

/// An SSH public key registered on the account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    /// Key identifier.
    pub id: ResourceId,
    /// Key name used as the selector label.
    pub name: String,
    /// Public key material.
    #[serde(default)]
    pub ssh_key: String,
    /// Creation timestamp as reported by the API.
    #[serde(default)]
    pub date_created: String,
}

/// A purchasable instance plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier, for example `vc2-1c-1gb`.
    pub id: String,
    /// Virtual CPU count.
    #[serde(default)]
    pub vcpu_count: u32,
    /// Memory in MB.
    #[serde(default)]
    pub ram: u64,
    /// Disk size in GB.
    #[serde(default)]
    pub disk: u64,
    /// Monthly transfer allowance in GB.
    #[serde(default)]
    pub bandwidth: u64,
    /// Monthly price in USD.
    #[serde(default)]
    pub monthly_cost: f64,
    /// Plan family, for example `vc2`.
    #[serde(rename = "type", default)]
    pub plan_type: String,
    /// Region identifiers where the plan is offered.
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Account details returned by the credential probe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account holder name.
    #[serde(default)]
    pub name: String,
    /// Account e-mail address.
    #[serde(default)]
    pub email: String,
    /// Permissions granted to the API key.
    #[serde(default)]
    pub acls: Vec<String>,
    /// Remaining account balance.
    #[serde(default)]
    pub balance: f64,
}

/// A compute instance as reported by the API.
///
/// Only the fields the client reasons about are typed; everything else is
/// kept in `extra` so the full record can be printed back unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance identifier.
    pub id: String,
    /// User supplied label.
    #[serde(default)]
    pub label: String,
    /// Lifecycle status: `pending`, `active`, `suspended`, `resizing`.
    pub status: String,
    /// Server status: `none`, `locked`, `installingbooting`, `ok`.
    pub server_status: String,
    /// Power status: `running` or `stopped`.
    pub power_status: String,
    /// Remaining fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body submitted to `POST /instances`.
///
/// Unresolved selectors are serialised as `null` and left for the API to
/// reject.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InstanceSpec {
    /// Region identifier.
    pub region: Option<ResourceId>,
    /// Plan identifier.
    pub plan: String,
    /// Instance label.
    pub label: String,
    /// Operating system identifier.
    pub os_id: Option<ResourceId>,
    /// SSH keys installed on first boot.
    pub sshkey_id: Vec<Option<ResourceId>>,
}

/// `{"instance": {...}}` wrapper used by the instance endpoints.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InstanceEnvelope {
    /// Wrapped instance.
    pub instance: Instance,
}

#[derive(Deserialize)]
pub(super) struct RegionList {
    pub(super) regions: Vec<Region>,
}

#[derive(Deserialize)]
pub(super) struct OsList {
    pub(super) os: Vec<OperatingSystem>,
}

#[derive(Deserialize)]
pub(super) struct SshKeyList {
    pub(super) ssh_keys: Vec<SshKey>,
}

#[derive(Deserialize)]
pub(super) struct PlanList {
    pub(super) plans: Vec<Plan>,
}

#[derive(Deserialize)]
pub(super) struct AccountEnvelope {
    pub(super) account: Account,
}
