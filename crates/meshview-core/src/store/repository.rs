// ── Central entity repository ──
//
// Thread-safe storage for all overlay entities the console works with.
// Owned by the host application for the lifetime of the admin session;
// all projections read from its snapshots.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{DnsRecord, EntityId, ExternalClient, Host, Node};

/// All collections fetched during a single refresh cycle.
pub struct RefreshSnapshot {
    pub nodes: Vec<Node>,
    pub hosts: Vec<Host>,
    pub clients: Vec<ExternalClient>,
    pub dns: Vec<DnsRecord>,
}

/// Central store for overlay entities.
///
/// Collections are keyed by entity id (nodes, hosts) or by composite key
/// (clients by `"{client}@{network}"`, DNS by `"{name}.{network}"`).
/// Refreshes apply upsert-then-prune so subscribers never observe a brief
/// empty state.
pub struct EntityRepository {
    nodes: EntityCollection<Node>,
    hosts: EntityCollection<Host>,
    clients: EntityCollection<ExternalClient>,
    dns: EntityCollection<DnsRecord>,
    last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl EntityRepository {
    pub fn new() -> Self {
        let (last_full_refresh, _) = watch::channel(None);
        Self {
            nodes: EntityCollection::new(),
            hosts: EntityCollection::new(),
            clients: EntityCollection::new(),
            dns: EntityCollection::new(),
            last_full_refresh,
        }
    }

    // ── Keys ─────────────────────────────────────────────────────────

    pub(crate) fn client_key(client_id: &str, network: &str) -> String {
        format!("{client_id}@{network}")
    }

    pub(crate) fn dns_key(name: &str, network: &str) -> String {
        format!("{name}.{network}")
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn nodes_snapshot(&self) -> Arc<Vec<Arc<Node>>> {
        self.nodes.snapshot()
    }

    pub fn hosts_snapshot(&self) -> Arc<Vec<Arc<Host>>> {
        self.hosts.snapshot()
    }

    pub fn clients_snapshot(&self) -> Arc<Vec<Arc<ExternalClient>>> {
        self.clients.snapshot()
    }

    pub fn dns_snapshot(&self) -> Arc<Vec<Arc<DnsRecord>>> {
        self.dns.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn node_by_id(&self, id: &EntityId) -> Option<Arc<Node>> {
        self.nodes.get(&id.to_string())
    }

    pub fn host_by_id(&self, id: &EntityId) -> Option<Arc<Host>> {
        self.hosts.get(&id.to_string())
    }

    /// Display name of a host, used for gateway/relay joins.
    pub fn host_name(&self, id: &EntityId) -> Option<String> {
        self.host_by_id(id).map(|h| h.name.clone())
    }

    pub fn client(&self, client_id: &str, network: &str) -> Option<Arc<ExternalClient>> {
        self.clients.get(&Self::client_key(client_id, network))
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_nodes(&self) -> watch::Receiver<Arc<Vec<Arc<Node>>>> {
        self.nodes.subscribe()
    }

    pub fn subscribe_hosts(&self) -> watch::Receiver<Arc<Vec<Arc<Host>>>> {
        self.hosts.subscribe()
    }

    pub fn subscribe_clients(&self) -> watch::Receiver<Arc<Vec<Arc<ExternalClient>>>> {
        self.clients.subscribe()
    }

    // ── Refresh application ──────────────────────────────────────────

    /// Apply a full data refresh.
    ///
    /// Uses upsert-then-prune: incoming entities are upserted first, then
    /// any keys not present in the incoming set are removed. This avoids
    /// the brief "empty" state that clear-then-insert would cause.
    pub fn apply_refresh(&self, snap: RefreshSnapshot) {
        upsert_and_prune(
            &self.nodes,
            snap.nodes
                .into_iter()
                .map(|n| (n.id.to_string(), n))
                .collect(),
        );
        upsert_and_prune(
            &self.hosts,
            snap.hosts
                .into_iter()
                .map(|h| (h.id.to_string(), h))
                .collect(),
        );
        upsert_and_prune(
            &self.clients,
            snap.clients
                .into_iter()
                .map(|c| (Self::client_key(&c.client_id, &c.network), c))
                .collect(),
        );
        upsert_and_prune(
            &self.dns,
            snap.dns
                .into_iter()
                .map(|d| (Self::dns_key(&d.name, &d.network), d))
                .collect(),
        );

        self.last_full_refresh.send_replace(Some(Utc::now()));
    }

    /// Replace the node collection only (after a role mutation).
    pub fn apply_nodes(&self, nodes: Vec<Node>) {
        upsert_and_prune(
            &self.nodes,
            nodes.into_iter().map(|n| (n.id.to_string(), n)).collect(),
        );
    }

    /// Drop a single external client (after a remote delete).
    pub fn remove_client(&self, client_id: &str, network: &str) -> Option<Arc<ExternalClient>> {
        self.clients.remove(&Self::client_key(client_id, network))
    }

    /// Drop a single DNS entry (after a remote delete).
    pub fn remove_dns(&self, name: &str, network: &str) -> Option<Arc<DnsRecord>> {
        self.dns.remove(&Self::dns_key(name, network))
    }

    /// Upsert a single external client (after a remote update).
    pub fn upsert_client(&self, client: ExternalClient) {
        self.clients
            .upsert(Self::client_key(&client.client_id, &client.network), client);
    }

    /// Upsert a single DNS entry (after a remote create).
    pub fn upsert_dns(&self, record: DnsRecord) {
        self.dns
            .upsert(Self::dns_key(&record.name, &record.network), record);
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    /// How long ago the last full refresh occurred, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_full_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for EntityRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Upsert all incoming entities, then prune any existing keys not in the
/// incoming set.
fn upsert_and_prune<T: Send + Sync + 'static>(
    collection: &EntityCollection<T>,
    items: Vec<(String, T)>,
) {
    let incoming_keys: HashSet<String> = items.iter().map(|(k, _)| k.clone()).collect();
    for (key, entity) in items {
        collection.upsert(key, entity);
    }
    for existing_key in collection.keys() {
        if !incoming_keys.contains(&existing_key) {
            collection.remove(&existing_key);
        }
    }
}
