// ── Admin console session ──
//
// Ties the API client and the entity repository together for the lifetime
// of an admin session: full refreshes, per-network ACL sessions, and the
// mutations the console exposes. After a role mutation the node collection
// is re-fetched rather than patched locally, since role changes ripple
// into fields the mutation response does not carry.

use std::sync::Arc;

use tracing::{debug, info};

use meshview_api::{ApiClient, ExternalClientPatch, WireDnsRecord};

use crate::acl::AclMatrixController;
use crate::egress::{RangeRemoval, RangeSetEditor};
use crate::error::CoreError;
use crate::model::{DnsRecord, EntityId, ExternalClient, Host, Node};
use crate::store::{EntityRepository, RefreshSnapshot};
use crate::views::TopologyProjector;

/// One admin session against a controller.
pub struct Console {
    api: ApiClient,
    repo: Arc<EntityRepository>,
}

impl Console {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            repo: Arc::new(EntityRepository::new()),
        }
    }

    pub fn repository(&self) -> &Arc<EntityRepository> {
        &self.repo
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// A projector over the current repository state, scoped to `network`.
    pub fn projector(&self, network: impl Into<String>) -> TopologyProjector {
        TopologyProjector::new(&self.repo, network)
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch all four entity collections concurrently and apply them as
    /// one snapshot.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let (nodes, hosts, clients, dns) = tokio::join!(
            self.api.list_nodes(),
            self.api.list_hosts(),
            self.api.list_external_clients(),
            self.api.list_dns(),
        );

        self.repo.apply_refresh(RefreshSnapshot {
            nodes: nodes
                .map_err(|e| CoreError::remote("list nodes", e))?
                .into_iter()
                .map(Node::from)
                .collect(),
            hosts: hosts
                .map_err(|e| CoreError::remote("list hosts", e))?
                .into_iter()
                .map(Host::from)
                .collect(),
            clients: clients
                .map_err(|e| CoreError::remote("list clients", e))?
                .into_iter()
                .map(ExternalClient::from)
                .collect(),
            dns: dns
                .map_err(|e| CoreError::remote("list dns", e))?
                .into_iter()
                .map(DnsRecord::from)
                .collect(),
        });
        info!(
            nodes = self.repo.node_count(),
            hosts = self.repo.host_count(),
            clients = self.repo.client_count(),
            "full refresh applied"
        );
        Ok(())
    }

    /// Re-fetch the node collection only.
    async fn refresh_nodes(&self) -> Result<(), CoreError> {
        let nodes = self
            .api
            .list_nodes()
            .await
            .map_err(|e| CoreError::remote("list nodes", e))?;
        self.repo
            .apply_nodes(nodes.into_iter().map(Node::from).collect());
        Ok(())
    }

    // ── Access control ───────────────────────────────────────────────

    /// Start an ACL editing session for a network.
    pub async fn load_acls(&self, network: &str) -> Result<AclMatrixController, CoreError> {
        let container = self
            .api
            .get_acls(network)
            .await
            .map_err(|e| CoreError::remote("fetch ACLs", e))?;
        Ok(AclMatrixController::load(network, container))
    }

    /// Push an ACL draft. The controller's response becomes the session's
    /// new baseline.
    pub async fn commit_acls(&self, session: &mut AclMatrixController) -> Result<(), CoreError> {
        let network = session.network().to_string();
        session
            .commit(|container| async move { self.api.update_acls(&network, &container).await })
            .await
    }

    // ── Gateway roles ────────────────────────────────────────────────

    pub async fn create_ingress(&self, node: &EntityId, network: &str) -> Result<(), CoreError> {
        self.api
            .create_ingress(&node.to_string(), network)
            .await
            .map_err(|e| CoreError::remote("create ingress gateway", e))?;
        self.refresh_nodes().await
    }

    pub async fn delete_ingress(&self, node: &EntityId, network: &str) -> Result<(), CoreError> {
        self.api
            .delete_ingress(&node.to_string(), network)
            .await
            .map_err(|e| CoreError::remote("delete ingress gateway", e))?;
        self.refresh_nodes().await
    }

    /// Add one CIDR range to a node's egress role, creating the role if
    /// the node does not hold it yet.
    pub async fn add_egress_range(
        &self,
        node: &EntityId,
        range: &str,
        nat_enabled: bool,
    ) -> Result<(), CoreError> {
        let node = self
            .repo
            .node_by_id(node)
            .ok_or_else(|| CoreError::not_found("node", node))?;
        RangeSetEditor::new(&self.api)
            .add_range(&node, range, nat_enabled)
            .await?;
        self.refresh_nodes().await
    }

    /// Remove one CIDR range from a node's egress role.
    ///
    /// Delete-then-recreate under the hood; see
    /// [`CoreError::EgressRoleLost`] for the partial-failure case.
    pub async fn remove_egress_range(
        &self,
        node: &EntityId,
        range: &str,
    ) -> Result<RangeRemoval, CoreError> {
        let node = self
            .repo
            .node_by_id(node)
            .ok_or_else(|| CoreError::not_found("node", node))?;
        let outcome = RangeSetEditor::new(&self.api)
            .remove_range(&node, range)
            .await?;
        self.refresh_nodes().await?;
        Ok(outcome)
    }

    /// Remove a host's relay role.
    pub async fn delete_relay(&self, host: &EntityId) -> Result<(), CoreError> {
        self.api
            .delete_relay(&host.to_string())
            .await
            .map_err(|e| CoreError::remote("delete relay", e))?;
        // relay flags live on hosts; a full refresh keeps relayed hosts
        // consistent with their relay
        self.refresh().await
    }

    // ── External clients ─────────────────────────────────────────────

    /// Enable or disable an external client.
    pub async fn set_client_enabled(
        &self,
        client_id: &str,
        network: &str,
        enabled: bool,
    ) -> Result<(), CoreError> {
        let patch = ExternalClientPatch {
            enabled: Some(enabled),
            ..ExternalClientPatch::default()
        };
        let updated = self
            .api
            .update_external_client(client_id, network, &patch)
            .await
            .map_err(|e| CoreError::remote("update client", e))?;
        self.repo.upsert_client(ExternalClient::from(updated));
        debug!(client_id, network, enabled, "client toggled");
        Ok(())
    }

    pub async fn delete_client(&self, client_id: &str, network: &str) -> Result<(), CoreError> {
        self.api
            .delete_external_client(client_id, network)
            .await
            .map_err(|e| CoreError::remote("delete client", e))?;
        self.repo.remove_client(client_id, network);
        Ok(())
    }

    // ── DNS ──────────────────────────────────────────────────────────

    pub async fn create_dns_record(&self, record: DnsRecord) -> Result<(), CoreError> {
        if record.name.is_empty() {
            return Err(CoreError::invalid("DNS name must not be empty"));
        }
        let wire = WireDnsRecord {
            name: record.name,
            network: record.network,
            address: record.address.unwrap_or_default(),
            address6: record.address6.unwrap_or_default(),
        };
        let created = self
            .api
            .create_dns(&wire)
            .await
            .map_err(|e| CoreError::remote("create dns entry", e))?;
        self.repo.upsert_dns(DnsRecord::from(created));
        Ok(())
    }

    pub async fn delete_dns_record(&self, name: &str, network: &str) -> Result<(), CoreError> {
        self.api
            .delete_dns(network, name)
            .await
            .map_err(|e| CoreError::remote("delete dns entry", e))?;
        self.repo.remove_dns(name, network);
        Ok(())
    }
}
