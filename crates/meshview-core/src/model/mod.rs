// ── Unified domain model ──
//
// Every type in this module is the canonical representation of an overlay
// entity. Wire shapes from `meshview-api` are normalized into these in
// `crate::convert`; consumers never see raw controller JSON.

pub mod acl;
pub mod client;
pub mod dns;
pub mod entity_id;
pub mod host;
pub mod node;

pub use acl::{AclLevel, AclMatrix};
pub use client::ExternalClient;
pub use dns::DnsRecord;
pub use entity_id::EntityId;
pub use host::Host;
pub use node::Node;
