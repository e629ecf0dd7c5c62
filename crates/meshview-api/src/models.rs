// Wire types for the overlay controller REST API
//
// Field names mirror the controller's JSON exactly (lowercased run-together
// names, `relayed_by` with an underscore, `natEnabled` camelCase on the
// egress create payload). Normalization into clean domain types happens in
// `meshview-core`, never here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A network membership instance as the controller returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    #[serde(default)]
    pub hostid: String,
    pub network: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address6: String,
    #[serde(default)]
    pub isingressgateway: bool,
    #[serde(default)]
    pub isegressgateway: bool,
    #[serde(default)]
    pub egressgatewayranges: Vec<String>,
    #[serde(default)]
    pub egressgatewaynatenabled: bool,
    #[serde(default)]
    pub connected: bool,
}

/// A physical or logical device as the controller returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireHost {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpointip: String,
    #[serde(default)]
    pub isrelay: bool,
    #[serde(default)]
    pub isrelayed: bool,
    #[serde(default)]
    pub relayed_by: String,
}

/// A remote-access client credential bound to an ingress gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireExternalClient {
    pub clientid: String,
    pub network: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address6: String,
    #[serde(default)]
    pub publickey: String,
    #[serde(default)]
    pub dns: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub ingressgatewayid: String,
}

fn default_true() -> bool {
    true
}

/// A DNS entry, uniquely keyed by `(name, network)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDnsRecord {
    pub name: String,
    pub network: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address6: String,
}

/// The per-network ACL container: node id -> node id -> level.
///
/// Levels: 0 = no explicit rule, 1 = denied, 2 = allowed. BTree maps keep
/// iteration and serialization order deterministic.
pub type WireAclContainer = BTreeMap<String, BTreeMap<String, u8>>;

/// Payload for `POST .../createegress`.
///
/// The controller takes the NAT flag as the string `"yes"`/`"no"`, not a
/// boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEgressRequest {
    pub ranges: Vec<String>,
    #[serde(rename = "natEnabled")]
    pub nat_enabled: String,
}

impl CreateEgressRequest {
    pub fn new(ranges: Vec<String>, nat_enabled: bool) -> Self {
        Self {
            ranges,
            nat_enabled: if nat_enabled { "yes" } else { "no" }.into(),
        }
    }
}

/// Partial update for an external client. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clientid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Error body the controller attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "Message", alias = "message")]
    pub message: Option<String>,
}
