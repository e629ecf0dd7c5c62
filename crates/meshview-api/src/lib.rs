// meshview-api: Raw async client for the mesh overlay controller REST API.
//
// This crate speaks the controller's wire format verbatim and nothing else.
// Domain normalization, derived views, and edit tracking live in
// `meshview-core`.

pub mod client;
pub mod error;
pub mod models;

mod acls;
mod clients;
mod dns;
mod hosts;
mod nodes;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    CreateEgressRequest, ExternalClientPatch, WireAclContainer, WireDnsRecord,
    WireExternalClient, WireHost, WireNode,
};
