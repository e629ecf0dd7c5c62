// Host endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::WireHost;

impl ApiClient {
    /// List all hosts registered with the controller.
    ///
    /// `GET /api/hosts`
    pub async fn list_hosts(&self) -> Result<Vec<WireHost>, Error> {
        let url = self.api_url("hosts")?;
        debug!("listing hosts");
        self.get(url).await
    }

    /// Remove a host's relay role.
    ///
    /// `DELETE /api/hosts/{host}/relay`
    pub async fn delete_relay(&self, host_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("hosts/{host_id}/relay"))?;
        debug!(host_id, "deleting relay");
        self.delete(url).await
    }
}
