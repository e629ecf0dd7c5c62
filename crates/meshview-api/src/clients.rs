// External client endpoints
//
// Client ids are only unique within a network, so every mutating path is
// scoped by both.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ExternalClientPatch, WireExternalClient};

impl ApiClient {
    /// List all external clients across all networks.
    ///
    /// `GET /api/extclients`
    pub async fn list_external_clients(&self) -> Result<Vec<WireExternalClient>, Error> {
        let url = self.api_url("extclients")?;
        debug!("listing external clients");
        self.get(url).await
    }

    /// Partially update an external client (rename, enable/disable).
    ///
    /// `PUT /api/extclients/{network}/{client}`
    pub async fn update_external_client(
        &self,
        client_id: &str,
        network: &str,
        patch: &ExternalClientPatch,
    ) -> Result<WireExternalClient, Error> {
        let url = self.api_url(&format!("extclients/{network}/{client_id}"))?;
        debug!(client_id, network, "updating external client");
        self.put(url, patch).await
    }

    /// Delete an external client.
    ///
    /// `DELETE /api/extclients/{network}/{client}`
    pub async fn delete_external_client(&self, client_id: &str, network: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("extclients/{network}/{client_id}"))?;
        debug!(client_id, network, "deleting external client");
        self.delete(url).await
    }
}
