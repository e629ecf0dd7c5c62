// ── Topology projections ──
//
// Stateless derivation of filtered, role-specific views over repository
// snapshots. Every operation is pure: it takes the full snapshot state, a
// network scope, and free-text search terms, and never mutates or fails --
// missing joins degrade to empty results.
//
// Matching rules: search terms are case-insensitive substring matches and
// compose by intersection. Ordering is case-sensitive lexical on ids/names
// and all sorts are stable.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::model::{AclLevel, AclMatrix, EntityId, ExternalClient, Host, Node};
use crate::store::EntityRepository;

/// A gateway node joined with its host's display name.
#[derive(Debug, Clone)]
pub struct GatewayView {
    pub node: Arc<Node>,
    pub host_name: String,
}

/// One CIDR range paired with the egress node that exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRoute {
    pub node_id: EntityId,
    pub host_name: String,
    pub range: String,
}

/// One row of the access-control table: a node, its display name, and its
/// ACL entries restricted to the current network scope.
#[derive(Debug, Clone)]
pub struct AclRow {
    pub node_id: EntityId,
    pub host_name: String,
    pub rules: BTreeMap<EntityId, AclLevel>,
}

/// Derives role-specific views for a single network scope.
///
/// Construction captures cheap `Arc` snapshots of the repository
/// collections; the projector itself holds no mutable state and can be
/// rebuilt on every state change (recomputation is linear in collection
/// size, which is administrative scale).
pub struct TopologyProjector {
    nodes: Arc<Vec<Arc<Node>>>,
    clients: Arc<Vec<Arc<ExternalClient>>>,
    hosts_by_id: HashMap<EntityId, Arc<Host>>,
    network: String,
}

impl TopologyProjector {
    pub fn new(repo: &EntityRepository, network: impl Into<String>) -> Self {
        let hosts_by_id = repo
            .hosts_snapshot()
            .iter()
            .map(|h| (h.id.clone(), Arc::clone(h)))
            .collect();
        Self {
            nodes: repo.nodes_snapshot(),
            clients: repo.clients_snapshot(),
            hosts_by_id,
            network: network.into(),
        }
    }

    /// The network id all derivations are scoped to.
    pub fn network(&self) -> &str {
        &self.network
    }

    fn host_name(&self, id: &EntityId) -> Option<String> {
        self.hosts_by_id.get(id).map(|h| h.name.clone())
    }

    // ── Base scope ───────────────────────────────────────────────────

    /// Nodes in the scoped network whose address matches `host_search`.
    ///
    /// This is the base scope for every other derivation; role filters
    /// apply on top of it, never instead of it. Output is ordered by node
    /// id so downstream stable sorts are deterministic.
    pub fn network_nodes(&self, host_search: &str) -> Vec<Arc<Node>> {
        let mut nodes: Vec<Arc<Node>> = self
            .nodes
            .iter()
            .filter(|n| n.network == self.network)
            .filter(|n| n.address_matches(host_search))
            .map(Arc::clone)
            .collect();
        nodes.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
        nodes
    }

    // ── Gateways and clients ─────────────────────────────────────────

    /// Ingress gateways joined with host names, filtered by
    /// `gateway_search` against the name.
    ///
    /// A gateway whose host is unknown has no name to match and is
    /// excluded from this view (it still appears in `network_nodes`).
    pub fn client_gateways(&self, host_search: &str, gateway_search: &str) -> Vec<GatewayView> {
        self.gateways_by(host_search, gateway_search, |n| n.is_ingress_gateway)
    }

    /// External clients visible under the current gateway filter.
    ///
    /// With a selected gateway the scope narrows to exactly its clients;
    /// otherwise any client owned by a currently-filtered gateway is shown.
    /// Result is ordered by owning-gateway id (ascending, lexical).
    pub fn filtered_clients(
        &self,
        host_search: &str,
        gateway_search: &str,
        selected_gateway: Option<&EntityId>,
        client_search: &str,
    ) -> Vec<Arc<ExternalClient>> {
        let mut clients: Vec<Arc<ExternalClient>> = match selected_gateway {
            Some(gateway_id) => self
                .clients
                .iter()
                .filter(|c| c.network == self.network)
                .filter(|c| c.ingress_gateway_id == *gateway_id)
                .map(Arc::clone)
                .collect(),
            None => {
                let gateway_ids: BTreeSet<EntityId> = self
                    .client_gateways(host_search, gateway_search)
                    .into_iter()
                    .map(|g| g.node.id.clone())
                    .collect();
                self.clients
                    .iter()
                    .filter(|c| c.network == self.network)
                    .filter(|c| gateway_ids.contains(&c.ingress_gateway_id))
                    .map(Arc::clone)
                    .collect()
            }
        };
        clients.retain(|c| c.id_matches(client_search));
        clients.sort_by(|a, b| {
            a.ingress_gateway_id
                .to_string()
                .cmp(&b.ingress_gateway_id.to_string())
        });
        clients
    }

    // ── Egress ───────────────────────────────────────────────────────

    /// Egress gateways joined with host names, filtered by `egress_search`
    /// against the name.
    pub fn egress_gateways(&self, host_search: &str, egress_search: &str) -> Vec<GatewayView> {
        self.gateways_by(host_search, egress_search, |n| n.is_egress_gateway)
    }

    /// External CIDR routes.
    ///
    /// A selected egress narrows the view to exactly its ranges; with no
    /// selection the union across all filtered egress gateways is shown,
    /// ordered by owning-node id (never re-sorted by CIDR).
    pub fn external_routes(
        &self,
        host_search: &str,
        egress_search: &str,
        selected_egress: Option<&Node>,
    ) -> Vec<ExternalRoute> {
        if let Some(egress) = selected_egress {
            let host_name = self.host_name(&egress.host_id).unwrap_or_default();
            return egress
                .egress_ranges
                .iter()
                .map(|range| ExternalRoute {
                    node_id: egress.id.clone(),
                    host_name: host_name.clone(),
                    range: range.clone(),
                })
                .collect();
        }

        let mut routes: Vec<ExternalRoute> = self
            .egress_gateways(host_search, egress_search)
            .into_iter()
            .flat_map(|g| {
                g.node
                    .egress_ranges
                    .iter()
                    .map(|range| ExternalRoute {
                        node_id: g.node.id.clone(),
                        host_name: g.host_name.clone(),
                        range: range.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        routes.sort_by(|a, b| a.node_id.to_string().cmp(&b.node_id.to_string()));
        routes
    }

    // ── Relays ───────────────────────────────────────────────────────

    /// Relay hosts of the scoped nodes, filtered by `relay_search` against
    /// the host name.
    pub fn relays(&self, host_search: &str, relay_search: &str) -> Vec<Arc<Host>> {
        self.scoped_hosts(host_search)
            .into_iter()
            .filter(|h| h.is_relay)
            .filter(|h| h.name_matches(relay_search))
            .collect()
    }

    /// Relayed hosts of the scoped nodes.
    ///
    /// A selected relay restricts the view to hosts it relays; with no
    /// selection all relayed hosts are shown, ordered by relaying-host id.
    pub fn relayed_hosts(
        &self,
        host_search: &str,
        selected_relay: Option<&EntityId>,
    ) -> Vec<Arc<Host>> {
        let relayed = self
            .scoped_hosts(host_search)
            .into_iter()
            .filter(|h| h.is_relayed);

        match selected_relay {
            Some(relay_id) => relayed
                .filter(|h| h.relayed_by.as_ref() == Some(relay_id))
                .collect(),
            None => {
                let mut hosts: Vec<Arc<Host>> = relayed.collect();
                hosts.sort_by(|a, b| a.relayed_by_key().cmp(&b.relayed_by_key()));
                hosts
            }
        }
    }

    // ── Access control ───────────────────────────────────────────────

    /// The ACL table: scoped nodes joined with their matrix rows.
    ///
    /// Rows are restricted to counterparts that are themselves in the
    /// scoped node set -- entries referring to nodes of other networks
    /// never leak into a single-network view. Ordered by display name
    /// ascending, then filtered by `name_search` against the name.
    pub fn acl_table(
        &self,
        host_search: &str,
        name_search: &str,
        matrix: &AclMatrix,
    ) -> Vec<AclRow> {
        let scoped = self.network_nodes(host_search);
        let scope_ids: BTreeSet<EntityId> = scoped.iter().map(|n| n.id.clone()).collect();

        let mut rows: Vec<AclRow> = scoped
            .iter()
            .map(|node| {
                let rules = matrix
                    .row(&node.id)
                    .map(|row| {
                        row.iter()
                            .filter(|(counterpart, _)| scope_ids.contains(counterpart))
                            .map(|(counterpart, level)| (counterpart.clone(), *level))
                            .collect()
                    })
                    .unwrap_or_default();
                AclRow {
                    node_id: node.id.clone(),
                    host_name: self.host_name(&node.host_id).unwrap_or_default(),
                    rules,
                }
            })
            .collect();

        rows.sort_by(|a, b| a.host_name.cmp(&b.host_name));
        if !name_search.is_empty() {
            let needle = name_search.to_lowercase();
            rows.retain(|r| r.host_name.to_lowercase().contains(&needle));
        }
        rows
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn gateways_by(
        &self,
        host_search: &str,
        name_search: &str,
        role: impl Fn(&Node) -> bool,
    ) -> Vec<GatewayView> {
        self.network_nodes(host_search)
            .into_iter()
            .filter(|n| role(n))
            .filter_map(|node| {
                // No host record means no name to match: excluded here,
                // still present in `network_nodes`.
                let host_name = self.host_name(&node.host_id)?;
                Some(GatewayView { node, host_name })
            })
            .filter(|g| {
                name_search.is_empty()
                    || g.host_name.to_lowercase().contains(&name_search.to_lowercase())
            })
            .collect()
    }

    /// Hosts owning the scoped nodes, in scoped-node order.
    fn scoped_hosts(&self, host_search: &str) -> Vec<Arc<Host>> {
        self.network_nodes(host_search)
            .iter()
            .filter_map(|n| self.hosts_by_id.get(&n.host_id).map(Arc::clone))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::RefreshSnapshot;
    use crate::test_support::{ext_client, host, node};

    fn repo(nodes: Vec<Node>, hosts: Vec<Host>, clients: Vec<ExternalClient>) -> EntityRepository {
        let repo = EntityRepository::new();
        repo.apply_refresh(RefreshSnapshot {
            nodes,
            hosts,
            clients,
            dns: Vec::new(),
        });
        repo
    }

    fn id(s: &str) -> EntityId {
        EntityId::from(s)
    }

    #[test]
    fn network_nodes_scopes_by_network_and_address_search() {
        let mut n1 = node("n1", "h1", "office");
        n1.address = Some("10.10.0.1".into());
        let mut n2 = node("n2", "h2", "office");
        n2.address = Some("10.20.0.1".into());
        let n3 = node("n3", "h3", "lab");

        let repo = repo(vec![n1, n2, n3], vec![], vec![]);
        let p = TopologyProjector::new(&repo, "office");

        assert_eq!(p.network_nodes("").len(), 2);
        let matched = p.network_nodes("10.20");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, id("n2"));
        // other-network nodes never appear, whatever the search
        assert!(p.network_nodes("").iter().all(|n| n.network == "office"));
    }

    #[test]
    fn address_search_is_case_insensitive_and_applies_before_roles() {
        let mut gw = node("n1", "h1", "office");
        gw.is_ingress_gateway = true;
        gw.address = Some("10.10.0.1".into());
        let mut other = node("n2", "h2", "office");
        other.is_ingress_gateway = true;
        other.address = Some("10.99.0.1".into());

        let repo = repo(
            vec![gw, other],
            vec![host("h1", "alpha"), host("h2", "beta")],
            vec![],
        );
        let p = TopologyProjector::new(&repo, "office");

        // host search narrows the base scope; the role filter sees only
        // the surviving nodes
        let gws = p.client_gateways("10.10", "");
        assert_eq!(gws.len(), 1);
        assert_eq!(gws[0].host_name, "alpha");
    }

    #[test]
    fn gateways_without_a_host_record_are_excluded_from_named_views() {
        let mut gw = node("n1", "h-missing", "office");
        gw.is_ingress_gateway = true;

        let repo = repo(vec![gw], vec![], vec![]);
        let p = TopologyProjector::new(&repo, "office");

        assert_eq!(p.network_nodes("").len(), 1);
        assert!(p.client_gateways("", "").is_empty());
    }

    #[test]
    fn gateway_name_search_filters_independently() {
        let mut g1 = node("n1", "h1", "office");
        g1.is_ingress_gateway = true;
        let mut g2 = node("n2", "h2", "office");
        g2.is_ingress_gateway = true;

        let repo = repo(
            vec![g1, g2],
            vec![host("h1", "edge-paris"), host("h2", "edge-tokyo")],
            vec![],
        );
        let p = TopologyProjector::new(&repo, "office");

        assert_eq!(p.client_gateways("", "").len(), 2);
        let filtered = p.client_gateways("", "TOKYO");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].host_name, "edge-tokyo");
    }

    #[test]
    fn clients_follow_the_filtered_gateway_set_when_nothing_is_selected() {
        let mut g1 = node("n1", "h1", "office");
        g1.is_ingress_gateway = true;
        let mut g2 = node("n2", "h2", "office");
        g2.is_ingress_gateway = true;

        let repo = repo(
            vec![g1, g2],
            vec![host("h1", "edge-paris"), host("h2", "edge-tokyo")],
            vec![
                ext_client("laptop", "office", "n1"),
                ext_client("phone", "office", "n2"),
                ext_client("stray", "lab", "n9"),
            ],
        );
        let p = TopologyProjector::new(&repo, "office");

        assert_eq!(p.filtered_clients("", "", None, "").len(), 2);

        // narrowing the gateway filter narrows the client set
        let narrowed = p.filtered_clients("", "paris", None, "");
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].client_id, "laptop");
    }

    #[test]
    fn selected_gateway_overrides_the_gateway_filter() {
        let mut g1 = node("n1", "h1", "office");
        g1.is_ingress_gateway = true;
        let mut g2 = node("n2", "h2", "office");
        g2.is_ingress_gateway = true;

        let repo = repo(
            vec![g1, g2],
            vec![host("h1", "edge-paris"), host("h2", "edge-tokyo")],
            vec![
                ext_client("laptop", "office", "n1"),
                ext_client("phone", "office", "n2"),
            ],
        );
        let p = TopologyProjector::new(&repo, "office");

        // selection wins even when the search would exclude that gateway
        let selected = p.filtered_clients("", "tokyo", Some(&id("n1")), "");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].client_id, "laptop");
    }

    #[test]
    fn clients_sort_by_owning_gateway_id() {
        let mut g1 = node("na", "h1", "office");
        g1.is_ingress_gateway = true;
        let mut g2 = node("nb", "h2", "office");
        g2.is_ingress_gateway = true;

        let repo = repo(
            vec![g1, g2],
            vec![host("h1", "one"), host("h2", "two")],
            vec![
                ext_client("z-client", "office", "nb"),
                ext_client("a-client", "office", "na"),
            ],
        );
        let p = TopologyProjector::new(&repo, "office");

        let clients = p.filtered_clients("", "", None, "");
        assert_eq!(clients[0].ingress_gateway_id, id("na"));
        assert_eq!(clients[1].ingress_gateway_id, id("nb"));
    }

    #[test]
    fn selected_egress_narrows_routes_to_exactly_its_ranges() {
        let mut e1 = node("n1", "h1", "office");
        e1.is_egress_gateway = true;
        e1.egress_ranges = ["10.1.0.0/16", "10.2.0.0/16"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut e2 = node("n2", "h2", "office");
        e2.is_egress_gateway = true;
        e2.egress_ranges = ["192.168.0.0/24"].into_iter().map(String::from).collect();

        let repo = repo(
            vec![e1.clone(), e2],
            vec![host("h1", "one"), host("h2", "two")],
            vec![],
        );
        let p = TopologyProjector::new(&repo, "office");

        let selected = p.external_routes("", "", Some(&e1));
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.node_id == id("n1")));

        let union = p.external_routes("", "", None);
        assert_eq!(union.len(), 3);
        // ordered by owning node, not by CIDR
        assert_eq!(union[0].node_id, id("n1"));
        assert_eq!(union[2].node_id, id("n2"));
        assert_eq!(union[2].range, "192.168.0.0/24");
    }

    #[test]
    fn relays_and_relayed_hosts_respect_selection() {
        let n1 = node("n1", "h1", "office");
        let n2 = node("n2", "h2", "office");
        let n3 = node("n3", "h3", "office");

        let mut relay = host("h1", "relay-1");
        relay.is_relay = true;
        let mut relayed_a = host("h2", "cellar");
        relayed_a.is_relayed = true;
        relayed_a.relayed_by = Some(id("h1"));
        let mut relayed_b = host("h3", "attic");
        relayed_b.is_relayed = true;
        relayed_b.relayed_by = Some(id("h9"));

        let repo = repo(vec![n1, n2, n3], vec![relay, relayed_a, relayed_b], vec![]);
        let p = TopologyProjector::new(&repo, "office");

        let relays = p.relays("", "");
        assert_eq!(relays.len(), 1);
        assert_eq!(relays[0].name, "relay-1");
        assert!(p.relays("", "nomatch").is_empty());

        let all_relayed = p.relayed_hosts("", None);
        assert_eq!(all_relayed.len(), 2);
        // ordered by relaying-host id: h1 before h9
        assert_eq!(all_relayed[0].name, "cellar");

        let only_h1 = p.relayed_hosts("", Some(&id("h1")));
        assert_eq!(only_h1.len(), 1);
        assert_eq!(only_h1[0].name, "cellar");
    }

    #[test]
    fn acl_table_never_leaks_cross_network_counterparts() {
        let n1 = node("n1", "h1", "office");
        let n2 = node("n2", "h2", "office");
        let foreign = node("nx", "hx", "lab");

        let mut matrix = AclMatrix::new();
        matrix.insert("n1", "n2", AclLevel::Allow);
        matrix.insert("n2", "n1", AclLevel::Allow);
        matrix.insert("n1", "nx", AclLevel::Deny);
        matrix.insert("nx", "n1", AclLevel::Deny);

        let repo = repo(
            vec![n1, n2, foreign],
            vec![host("h1", "alpha"), host("h2", "beta")],
            vec![],
        );
        let p = TopologyProjector::new(&repo, "office");

        let rows = p.acl_table("", "", &matrix);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(!row.rules.contains_key(&id("nx")));
        }
        // the in-scope relation survives
        let n1_row = rows.iter().find(|r| r.node_id == id("n1")).unwrap();
        assert_eq!(n1_row.rules.get(&id("n2")), Some(&AclLevel::Allow));
    }

    #[test]
    fn acl_table_orders_by_name_and_filters_by_name_search() {
        let n1 = node("n1", "h1", "office");
        let n2 = node("n2", "h2", "office");
        let n3 = node("n3", "h3", "office");

        let repo = repo(
            vec![n1, n2, n3],
            vec![host("h1", "zeta"), host("h2", "alpha"), host("h3", "mid")],
            vec![],
        );
        let p = TopologyProjector::new(&repo, "office");

        let rows = p.acl_table("", "", &AclMatrix::new());
        let names: Vec<&str> = rows.iter().map(|r| r.host_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);

        let filtered = p.acl_table("", "ALP", &AclMatrix::new());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].host_name, "alpha");
    }

    #[test]
    fn derivations_on_an_empty_repository_are_empty_not_errors() {
        let repo = EntityRepository::new();
        let p = TopologyProjector::new(&repo, "office");

        assert!(p.network_nodes("").is_empty());
        assert!(p.client_gateways("", "").is_empty());
        assert!(p.filtered_clients("", "", None, "").is_empty());
        assert!(p.external_routes("", "", None).is_empty());
        assert!(p.relays("", "").is_empty());
        assert!(p.relayed_hosts("", None).is_empty());
        assert!(p.acl_table("", "", &AclMatrix::new()).is_empty());
    }
}
