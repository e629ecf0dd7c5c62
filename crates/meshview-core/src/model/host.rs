// ── Host domain type ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A physical or logical device participating in the overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub id: EntityId,
    pub name: String,
    pub endpoint_ip: Option<IpAddr>,

    // Relay topology
    pub is_relay: bool,
    pub is_relayed: bool,
    /// The host relaying this one, when `is_relayed` is set.
    pub relayed_by: Option<EntityId>,
}

impl Host {
    /// Case-insensitive substring match against the display name.
    pub(crate) fn name_matches(&self, search: &str) -> bool {
        search.is_empty() || self.name.to_lowercase().contains(&search.to_lowercase())
    }

    /// Sort key for the "relayed hosts" view: hosts without a relay sort
    /// first, then lexically by relay id.
    pub(crate) fn relayed_by_key(&self) -> String {
        self.relayed_by
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}
