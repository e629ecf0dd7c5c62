// ── Egress range editing ──
//
// The controller has no "remove one range" endpoint: the egress role is a
// whole resource, created with a full range list and deleted as a unit.
// Removing a single range is therefore delete-then-recreate, and the gap
// between the two calls is real -- if the recreate fails, the node has
// lost its entire egress role, which `CoreError::EgressRoleLost` reports
// explicitly.

use tracing::{debug, warn};

use meshview_api::{ApiClient, CreateEgressRequest, WireNode};

use crate::error::CoreError;
use crate::model::Node;

/// The two egress-role endpoints, abstracted so the editor can be driven
/// by anything that speaks them.
pub trait EgressRoles {
    async fn create_egress(
        &self,
        node_id: &str,
        network: &str,
        request: &CreateEgressRequest,
    ) -> Result<WireNode, meshview_api::Error>;

    async fn delete_egress(&self, node_id: &str, network: &str)
    -> Result<(), meshview_api::Error>;
}

impl EgressRoles for ApiClient {
    async fn create_egress(
        &self,
        node_id: &str,
        network: &str,
        request: &CreateEgressRequest,
    ) -> Result<WireNode, meshview_api::Error> {
        ApiClient::create_egress(self, node_id, network, request).await
    }

    async fn delete_egress(
        &self,
        node_id: &str,
        network: &str,
    ) -> Result<(), meshview_api::Error> {
        ApiClient::delete_egress(self, node_id, network).await
    }
}

/// Outcome of removing one range from an egress gateway.
#[derive(Debug)]
pub enum RangeRemoval {
    /// The role was recreated with the remaining ranges.
    Updated(Node),
    /// The removed range was the last one; the node no longer has an
    /// egress role at all.
    RoleRemoved,
}

/// Edits the CIDR range set of egress gateways.
pub struct RangeSetEditor<'a, A: EgressRoles> {
    api: &'a A,
}

impl<'a, A: EgressRoles> RangeSetEditor<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Remove one range from a node's egress role.
    ///
    /// Validates locally first (the node must hold the role and the
    /// range), then deletes the whole role and recreates it with the
    /// remaining ranges. The sequence is not atomic: a failed recreate
    /// surfaces as [`CoreError::EgressRoleLost`] rather than a generic
    /// remote error, because at that point the node routes nothing.
    pub async fn remove_range(&self, node: &Node, range: &str) -> Result<RangeRemoval, CoreError> {
        if !node.is_egress_gateway {
            return Err(CoreError::invalid(format!(
                "node {} is not an egress gateway",
                node.id
            )));
        }
        if !node.egress_ranges.contains(range) {
            return Err(CoreError::not_found("egress range", range));
        }

        let node_id = node.id.to_string();
        let remaining: Vec<String> = node
            .egress_ranges
            .iter()
            .filter(|r| r.as_str() != range)
            .cloned()
            .collect();

        self.api
            .delete_egress(&node_id, &node.network)
            .await
            .map_err(|err| CoreError::remote("delete egress role", err))?;

        if remaining.is_empty() {
            debug!(node = %node.id, range, "removed last egress range");
            return Ok(RangeRemoval::RoleRemoved);
        }

        let request = CreateEgressRequest::new(remaining, node.egress_nat_enabled);
        match self
            .api
            .create_egress(&node_id, &node.network, &request)
            .await
        {
            Ok(updated) => {
                debug!(node = %node.id, range, "removed egress range");
                Ok(RangeRemoval::Updated(Node::from(updated)))
            }
            Err(err) => {
                warn!(node = %node.id, range, error = %err, "egress recreate failed after delete");
                Err(CoreError::EgressRoleLost {
                    node: node.id.clone(),
                    removed_range: range.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Add a range to a node's egress role, creating the role when the
    /// node does not hold it yet. A single create call carries the full
    /// union, so no delete is involved and there is no partial state.
    pub async fn add_range(
        &self,
        node: &Node,
        range: &str,
        nat_enabled: bool,
    ) -> Result<Node, CoreError> {
        validate_cidr(range)?;
        if node.egress_ranges.contains(range) {
            return Err(CoreError::invalid(format!(
                "node {} already routes {range}",
                node.id
            )));
        }

        let mut ranges: Vec<String> = node.egress_ranges.iter().cloned().collect();
        ranges.push(range.to_string());
        let request = CreateEgressRequest::new(ranges, nat_enabled);

        let updated = self
            .api
            .create_egress(&node.id.to_string(), &node.network, &request)
            .await
            .map_err(|err| CoreError::remote("create egress role", err))?;
        debug!(node = %node.id, range, "added egress range");
        Ok(Node::from(updated))
    }
}

/// Shallow shape check: "address/prefix" with a parseable IP and numeric
/// prefix. The controller does the authoritative validation.
fn validate_cidr(range: &str) -> Result<(), CoreError> {
    let err = || CoreError::invalid(format!("not a CIDR range: {range:?}"));
    let (addr, prefix) = range.split_once('/').ok_or_else(err)?;
    if addr.parse::<std::net::IpAddr>().is_err() {
        return Err(err());
    }
    let bits = prefix.parse::<u8>().map_err(|_| err())?;
    let max = if addr.contains(':') { 128 } else { 32 };
    if bits > max {
        return Err(err());
    }
    Ok(())
}
