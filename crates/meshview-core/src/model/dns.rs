// ── DNS domain type ──

use serde::{Deserialize, Serialize};

/// A DNS entry, uniquely keyed by `(name, network)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: String,
    pub network: String,
    pub address: Option<String>,
    pub address6: Option<String>,
}

impl DnsRecord {
    /// The fully-qualified entry as shown to operators: `{name}.{network}`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.name, self.network)
    }
}
