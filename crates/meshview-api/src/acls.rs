// Access-control list endpoints
//
// The ACL container is read and written whole-matrix: the controller has no
// per-pair update. The PUT response is the authoritative post-write shape
// and callers must replace their local copy with it.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::WireAclContainer;

impl ApiClient {
    /// Fetch the full ACL container for a network.
    ///
    /// `GET /api/networks/{network}/acls`
    pub async fn get_acls(&self, network: &str) -> Result<WireAclContainer, Error> {
        let url = self.api_url(&format!("networks/{network}/acls"))?;
        debug!(network, "fetching acls");
        self.get(url).await
    }

    /// Replace the full ACL container for a network.
    ///
    /// `PUT /api/networks/{network}/acls` — returns the stored container.
    pub async fn update_acls(
        &self,
        network: &str,
        container: &WireAclContainer,
    ) -> Result<WireAclContainer, Error> {
        let url = self.api_url(&format!("networks/{network}/acls"))?;
        debug!(network, rows = container.len(), "updating acls");
        self.put(url, container).await
    }
}
