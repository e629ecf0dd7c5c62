// meshview-core: Domain logic for the mesh overlay admin console.
//
// Owns the canonical entity model, the reactive repository, pure topology
// projections, the ACL editing session, and the composite mutations
// (egress range editing) the controller API does not offer directly.
// Transport lives in `meshview-api`; this crate never touches HTTP beyond
// driving that client.

pub mod acl;
pub mod console;
pub mod egress;
pub mod error;
pub mod model;
pub mod store;
pub mod views;

mod convert;

pub use acl::AclMatrixController;
pub use console::Console;
pub use egress::{EgressRoles, RangeRemoval, RangeSetEditor};
pub use error::CoreError;
pub use model::{AclLevel, AclMatrix, DnsRecord, EntityId, ExternalClient, Host, Node};
pub use store::{EntityRepository, RefreshSnapshot};
pub use views::{AclRow, ExternalRoute, GatewayView, TopologyProjector};
