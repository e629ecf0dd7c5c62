// Node and gateway-role endpoints
//
// Role assignment is whole-resource: the controller exposes create/delete
// per role, never a partial patch. Removing a single egress range is
// therefore a delete-then-recreate sequence, implemented in
// `meshview-core`'s range editor.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CreateEgressRequest, WireNode};

impl ApiClient {
    /// List all nodes across all networks.
    ///
    /// `GET /api/nodes`
    pub async fn list_nodes(&self) -> Result<Vec<WireNode>, Error> {
        let url = self.api_url("nodes")?;
        debug!("listing nodes");
        self.get(url).await
    }

    /// Make a node an ingress (client) gateway.
    ///
    /// `POST /api/nodes/{network}/{node}/createingress`
    pub async fn create_ingress(&self, node_id: &str, network: &str) -> Result<WireNode, Error> {
        let url = self.api_url(&format!("nodes/{network}/{node_id}/createingress"))?;
        debug!(node_id, network, "creating ingress gateway");
        self.post(url, &serde_json::json!({})).await
    }

    /// Remove a node's ingress gateway role.
    ///
    /// `DELETE /api/nodes/{network}/{node}/deleteingress`
    pub async fn delete_ingress(&self, node_id: &str, network: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("nodes/{network}/{node_id}/deleteingress"))?;
        debug!(node_id, network, "deleting ingress gateway");
        self.delete(url).await
    }

    /// Make a node an egress gateway for the given CIDR ranges.
    ///
    /// `POST /api/nodes/{network}/{node}/createegress`
    pub async fn create_egress(
        &self,
        node_id: &str,
        network: &str,
        request: &CreateEgressRequest,
    ) -> Result<WireNode, Error> {
        let url = self.api_url(&format!("nodes/{network}/{node_id}/createegress"))?;
        debug!(node_id, network, ranges = request.ranges.len(), "creating egress gateway");
        self.post(url, request).await
    }

    /// Remove a node's egress gateway role (and all its ranges).
    ///
    /// `DELETE /api/nodes/{network}/{node}/deleteegress`
    pub async fn delete_egress(&self, node_id: &str, network: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("nodes/{network}/{node_id}/deleteegress"))?;
        debug!(node_id, network, "deleting egress gateway");
        self.delete(url).await
    }
}
