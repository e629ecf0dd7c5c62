// DNS endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::WireDnsRecord;

impl ApiClient {
    /// List all DNS entries across all networks.
    ///
    /// `GET /api/dns`
    pub async fn list_dns(&self) -> Result<Vec<WireDnsRecord>, Error> {
        let url = self.api_url("dns")?;
        debug!("listing dns entries");
        self.get(url).await
    }

    /// Create a DNS entry in a network.
    ///
    /// `POST /api/dns/{network}`
    pub async fn create_dns(&self, record: &WireDnsRecord) -> Result<WireDnsRecord, Error> {
        let url = self.api_url(&format!("dns/{}", record.network))?;
        debug!(name = %record.name, network = %record.network, "creating dns entry");
        self.post(url, record).await
    }

    /// Delete a DNS entry by `(network, name)`.
    ///
    /// `DELETE /api/dns/{network}/{name}`
    pub async fn delete_dns(&self, network: &str, name: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("dns/{network}/{name}"))?;
        debug!(name, network, "deleting dns entry");
        self.delete(url).await
    }
}
