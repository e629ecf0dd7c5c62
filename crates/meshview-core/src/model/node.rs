// ── Node domain type ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A network membership instance.
///
/// One host joins many networks; each membership is a distinct Node. Role
/// flags are granted and revoked wholesale by the controller's role
/// endpoints -- there is no partial patch for a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    pub host_id: EntityId,
    /// The network this membership belongs to (the scope of every
    /// projection).
    pub network: String,

    // Addresses inside the overlay
    pub address: Option<String>,
    pub address6: Option<String>,

    // Role flags
    pub is_ingress_gateway: bool,
    pub is_egress_gateway: bool,

    /// CIDR ranges this node exposes when it is an egress gateway.
    pub egress_ranges: BTreeSet<String>,
    pub egress_nat_enabled: bool,

    pub connected: bool,
}

impl Node {
    /// Case-insensitive substring match against the overlay address.
    ///
    /// An empty search term matches every node; a node without an address
    /// only matches the empty term.
    pub(crate) fn address_matches(&self, search: &str) -> bool {
        if search.is_empty() {
            return true;
        }
        self.address
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(&search.to_lowercase()))
    }
}
