// ── Core error types ──
//
// User-facing errors from meshview-core. Derivation functions never return
// these -- missing joins degrade to empty results. Mutations fail fast with
// `InvalidArgument`/`NotFound` before any remote call; remote failures carry
// the operation that failed so callers can report which entity was involved.

use thiserror::Error;

use crate::model::EntityId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local errors (never reach the network) ───────────────────────
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Remote operation failed ({operation}): {source}")]
    Remote {
        operation: String,
        #[source]
        source: meshview_api::Error,
    },

    /// The delete step of a range removal succeeded but the recreate step
    /// failed: the range is gone, and so is the node's entire egress role.
    ///
    /// This is a real partial-failure state, not a generic remote error --
    /// callers must report it as "range removed, egress role lost" so the
    /// operator knows the node no longer routes any external traffic.
    #[error(
        "range {removed_range} removed, but egress role on node {node} was lost: \
         recreate failed: {source}"
    )]
    EgressRoleLost {
        node: EntityId,
        removed_range: String,
        #[source]
        source: meshview_api::Error,
    },
}

impl CoreError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity_type: &'static str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn remote(operation: impl Into<String>, source: meshview_api::Error) -> Self {
        Self::Remote {
            operation: operation.into(),
            source,
        }
    }

    /// Returns `true` if retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { source, .. } | Self::EgressRoleLost { source, .. } => {
                source.is_transient()
            }
            _ => false,
        }
    }
}

impl From<meshview_api::Error> for CoreError {
    fn from(err: meshview_api::Error) -> Self {
        Self::Remote {
            operation: "controller request".into(),
            source: err,
        }
    }
}
