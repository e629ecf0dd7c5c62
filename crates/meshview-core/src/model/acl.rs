// ── Access-control matrix ──
//
// The matrix is a symmetric pairwise relation over nodes: for every stored
// pair (a, b) with a != b, level(a, b) == level(b, a). The diagonal carries
// no meaning and is never mutated. `AclMatrixController` owns all
// symmetric mutation; this module only provides the storage shape and
// directed primitives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Permission level for an ordered pair of nodes.
///
/// Wire representation is the integer the controller uses: 0 unset,
/// 1 denied, 2 allowed. Unknown integers decode as `Unset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", from = "u8")]
pub enum AclLevel {
    #[default]
    Unset,
    Deny,
    Allow,
}

impl AclLevel {
    /// `true` for the two explicit rule levels (`Deny`, `Allow`).
    pub fn is_explicit(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Flip an explicit rule; `Unset` stays `Unset`.
    pub fn toggled(self) -> Self {
        match self {
            Self::Deny => Self::Allow,
            Self::Allow => Self::Deny,
            Self::Unset => Self::Unset,
        }
    }
}

impl From<u8> for AclLevel {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Deny,
            2 => Self::Allow,
            _ => Self::Unset,
        }
    }
}

impl From<AclLevel> for u8 {
    fn from(level: AclLevel) -> Self {
        match level {
            AclLevel::Unset => 0,
            AclLevel::Deny => 1,
            AclLevel::Allow => 2,
        }
    }
}

/// The pairwise permission matrix for one network.
///
/// BTree maps keep iteration deterministic, which makes the dirty check a
/// plain structural equality and keeps serialized output stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclMatrix(BTreeMap<EntityId, BTreeMap<EntityId, AclLevel>>);

impl AclMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored level for the ordered pair `(a, b)`; `Unset` when either
    /// side has no row or no entry.
    pub fn level(&self, a: &EntityId, b: &EntityId) -> AclLevel {
        self.0
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or_default()
    }

    /// Whether `id` has a row in the matrix.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.0.contains_key(id)
    }

    /// A node's full row, when present.
    pub fn row(&self, id: &EntityId) -> Option<&BTreeMap<EntityId, AclLevel>> {
        self.0.get(id)
    }

    /// Iterate all rows.
    pub fn rows(&self) -> impl Iterator<Item = (&EntityId, &BTreeMap<EntityId, AclLevel>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Directed insert, creating the row if needed. Used when building a
    /// matrix from wire data or in tests; symmetric edits go through
    /// `AclMatrixController`.
    pub fn insert(&mut self, a: impl Into<EntityId>, b: impl Into<EntityId>, level: AclLevel) {
        self.0.entry(a.into()).or_default().insert(b.into(), level);
    }

    /// Directed write into an existing row. Returns `false` when the row
    /// or entry does not exist (nothing is created).
    pub(crate) fn set_existing(&mut self, a: &EntityId, b: &EntityId, level: AclLevel) -> bool {
        match self.0.get_mut(a).and_then(|row| row.get_mut(b)) {
            Some(slot) => {
                *slot = level;
                true
            }
            None => false,
        }
    }

    /// Set every stored off-diagonal entry to `level`. No entries are
    /// created or removed.
    pub(crate) fn fill(&mut self, level: AclLevel) {
        for (a, row) in &mut self.0 {
            for (b, slot) in row.iter_mut() {
                if a != b {
                    *slot = level;
                }
            }
        }
    }

    /// Verify the symmetry invariant. Test and debug helper.
    pub fn is_symmetric(&self) -> bool {
        self.0.iter().all(|(a, row)| {
            row.iter()
                .filter(|(b, _)| *b != a)
                .all(|(b, level)| self.level(b, a) == *level)
        })
    }
}

impl From<meshview_api::WireAclContainer> for AclMatrix {
    fn from(container: meshview_api::WireAclContainer) -> Self {
        let mut matrix = Self::new();
        for (a, row) in container {
            let a = EntityId::from(a);
            // Insert the row even when empty so `contains` sees the node.
            matrix.0.entry(a.clone()).or_default();
            for (b, raw) in row {
                matrix.insert(a.clone(), EntityId::from(b), AclLevel::from(raw));
            }
        }
        matrix
    }
}

impl From<&AclMatrix> for meshview_api::WireAclContainer {
    fn from(matrix: &AclMatrix) -> Self {
        matrix
            .0
            .iter()
            .map(|(a, row)| {
                (
                    a.to_string(),
                    row.iter()
                        .map(|(b, level)| (b.to_string(), u8::from(*level)))
                        .collect(),
                )
            })
            .collect()
    }
}
