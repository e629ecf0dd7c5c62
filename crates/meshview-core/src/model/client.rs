// ── External client domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A remote-access credential bound to an ingress gateway node.
///
/// The client id is unique within a network, not globally; every operation
/// on a client is scoped by both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalClient {
    pub client_id: String,
    pub network: String,

    pub address: Option<String>,
    pub address6: Option<String>,
    pub public_key: String,
    pub dns: Option<String>,
    pub enabled: bool,

    /// The gateway node terminating this client's connection.
    pub ingress_gateway_id: EntityId,
}

impl ExternalClient {
    pub(crate) fn id_matches(&self, search: &str) -> bool {
        search.is_empty() || self.client_id.to_lowercase().contains(&search.to_lowercase())
    }
}
