// ── API-to-domain type conversions ──
//
// Bridges raw `meshview_api` wire types into canonical domain types. Each
// `From` impl normalizes field names, turns empty strings into `None`, and
// parses strings into strong types where one exists.

use meshview_api::{WireDnsRecord, WireExternalClient, WireHost, WireNode};

use crate::model::{DnsRecord, EntityId, ExternalClient, Host, Node};

/// The controller encodes "absent" as the empty string.
fn non_empty(raw: String) -> Option<String> {
    if raw.is_empty() { None } else { Some(raw) }
}

impl From<WireNode> for Node {
    fn from(wire: WireNode) -> Self {
        Self {
            id: EntityId::from(wire.id),
            host_id: EntityId::from(wire.hostid),
            network: wire.network,
            address: non_empty(wire.address),
            address6: non_empty(wire.address6),
            is_ingress_gateway: wire.isingressgateway,
            is_egress_gateway: wire.isegressgateway,
            egress_ranges: wire.egressgatewayranges.into_iter().collect(),
            egress_nat_enabled: wire.egressgatewaynatenabled,
            connected: wire.connected,
        }
    }
}

impl From<WireHost> for Host {
    fn from(wire: WireHost) -> Self {
        Self {
            id: EntityId::from(wire.id),
            name: wire.name,
            endpoint_ip: wire.endpointip.parse().ok(),
            is_relay: wire.isrelay,
            is_relayed: wire.isrelayed,
            relayed_by: non_empty(wire.relayed_by).map(EntityId::from),
        }
    }
}

impl From<WireExternalClient> for ExternalClient {
    fn from(wire: WireExternalClient) -> Self {
        Self {
            client_id: wire.clientid,
            network: wire.network,
            address: non_empty(wire.address),
            address6: non_empty(wire.address6),
            public_key: wire.publickey,
            dns: non_empty(wire.dns),
            enabled: wire.enabled,
            ingress_gateway_id: EntityId::from(wire.ingressgatewayid),
        }
    }
}

impl From<WireDnsRecord> for DnsRecord {
    fn from(wire: WireDnsRecord) -> Self {
        Self {
            name: wire.name,
            network: wire.network,
            address: non_empty(wire.address),
            address6: non_empty(wire.address6),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_wire_strings_become_none() {
        let wire = WireHost {
            id: "2fab6f39-2dbc-4d64-9a5c-1adbd750a4a5".into(),
            name: "gateway-1".into(),
            endpointip: String::new(),
            isrelay: false,
            isrelayed: false,
            relayed_by: String::new(),
        };
        let host = Host::from(wire);
        assert!(host.endpoint_ip.is_none());
        assert!(host.relayed_by.is_none());
    }

    #[test]
    fn node_ranges_collect_into_a_set() {
        let wire = WireNode {
            id: "n1".into(),
            hostid: "h1".into(),
            network: "office".into(),
            address: "10.0.0.1".into(),
            address6: String::new(),
            isingressgateway: false,
            isegressgateway: true,
            egressgatewayranges: vec!["10.1.0.0/16".into(), "10.1.0.0/16".into()],
            egressgatewaynatenabled: true,
            connected: true,
        };
        let node = Node::from(wire);
        assert_eq!(node.egress_ranges.len(), 1);
        assert!(node.address6.is_none());
    }
}
