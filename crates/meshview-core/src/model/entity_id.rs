// ── Core identity type ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier for any overlay entity.
///
/// The controller hands out UUIDs for nodes and hosts but plain strings for
/// network ids and external-client ids. Both live behind this one type so
/// joins and ACL keys never care which kind they hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Opaque(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Opaque(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Opaque(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uuid_strings_parse_as_uuid() {
        let id = EntityId::from("2fab6f39-2dbc-4d64-9a5c-1adbd750a4a5");
        assert!(matches!(id, EntityId::Uuid(_)));
        assert_eq!(id.to_string(), "2fab6f39-2dbc-4d64-9a5c-1adbd750a4a5");
    }

    #[test]
    fn network_names_stay_opaque() {
        let id = EntityId::from("office-net");
        assert!(matches!(id, EntityId::Opaque(_)));
    }

    #[test]
    fn ordering_is_lexical_on_display_form_for_opaque_ids() {
        let a = EntityId::from("alpha");
        let b = EntityId::from("beta");
        assert!(a < b);
    }
}
