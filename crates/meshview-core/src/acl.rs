// ── ACL editing session ──
//
// Holds a working copy of one network's permission matrix next to the
// last-known server state. All mutation goes through this controller so
// the symmetry invariant can never be broken by a caller: every edit
// writes both directions of the pair in the same call.
//
// Commit pushes the whole matrix and adopts the controller's response as
// the new baseline -- the server is authoritative, the local copy is a
// draft.

use tracing::debug;

use crate::error::CoreError;
use crate::model::{AclLevel, AclMatrix, EntityId};
use meshview_api::WireAclContainer;

/// An in-progress edit of a network's ACL matrix.
pub struct AclMatrixController {
    network: String,
    baseline: AclMatrix,
    working: AclMatrix,
}

impl AclMatrixController {
    /// Start an editing session from freshly fetched wire data.
    pub fn load(network: impl Into<String>, container: WireAclContainer) -> Self {
        let baseline = AclMatrix::from(container);
        Self {
            network: network.into(),
            working: baseline.clone(),
            baseline,
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// The current draft, for rendering.
    pub fn working(&self) -> &AclMatrix {
        &self.working
    }

    /// The last state acknowledged by the controller.
    pub fn baseline(&self) -> &AclMatrix {
        &self.baseline
    }

    /// Whether the draft differs from the acknowledged state.
    ///
    /// Structural equality over BTree maps: order-independent, and a
    /// round-trip edit (set then set back) reads as clean again.
    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    /// Discard all draft edits.
    pub fn reset(&mut self) {
        self.working = self.baseline.clone();
    }

    // ── Symmetric mutation ───────────────────────────────────────────

    /// Set the rule between two distinct nodes, in both directions.
    ///
    /// Only the explicit levels can be written; clearing a rule back to
    /// unset is not a local operation. Fails without touching the draft
    /// when the nodes are equal or when either node has no row in the
    /// matrix (a node unknown to the controller cannot be given rules
    /// locally).
    pub fn set_pair(
        &mut self,
        a: &EntityId,
        b: &EntityId,
        level: AclLevel,
    ) -> Result<(), CoreError> {
        if !level.is_explicit() {
            return Err(CoreError::invalid("permission level must be allow or deny"));
        }
        if a == b {
            return Err(CoreError::invalid(
                "cannot set a permission between a node and itself",
            ));
        }
        for id in [a, b] {
            if !self.working.contains(id) {
                return Err(CoreError::not_found("ACL node", id));
            }
        }
        self.working.insert(a.clone(), b.clone(), level);
        self.working.insert(b.clone(), a.clone(), level);
        debug_assert!(self.working.is_symmetric());
        Ok(())
    }

    /// Flip the rule between two nodes: allowed becomes denied and vice
    /// versa, in both directions. An unset pair is left untouched.
    pub fn toggle(&mut self, a: &EntityId, b: &EntityId) -> Result<AclLevel, CoreError> {
        let current = self.working.level(a, b);
        if !current.is_explicit() {
            return Ok(current);
        }
        let next = current.toggled();
        self.set_pair(a, b, next)?;
        Ok(next)
    }

    /// Set every stored pair in the matrix to `level` (allow-all or
    /// deny-all). No pairs are created or removed; diagonal entries are
    /// left untouched, and symmetry is preserved trivially since every
    /// entry gets the same value.
    pub fn set_all(&mut self, level: AclLevel) -> Result<(), CoreError> {
        if !level.is_explicit() {
            return Err(CoreError::invalid("permission level must be allow or deny"));
        }
        self.working.fill(level);
        debug_assert!(self.working.is_symmetric());
        Ok(())
    }

    // ── Commit ───────────────────────────────────────────────────────

    /// Push the whole draft matrix and adopt the response as the new
    /// baseline. A clean session commits nothing.
    ///
    /// `push` performs the actual transfer (one whole-matrix PUT); on
    /// failure the draft is left untouched so the caller can retry or
    /// reset. There is no partial commit.
    pub async fn commit<F, Fut>(&mut self, push: F) -> Result<(), CoreError>
    where
        F: FnOnce(WireAclContainer) -> Fut,
        Fut: Future<Output = Result<WireAclContainer, meshview_api::Error>>,
    {
        if !self.is_dirty() {
            return Ok(());
        }
        let outgoing = WireAclContainer::from(&self.working);
        let acknowledged = push(outgoing)
            .await
            .map_err(|err| CoreError::remote("update ACLs", err))?;

        self.baseline = AclMatrix::from(acknowledged);
        self.working = self.baseline.clone();
        debug!(network = %self.network, "ACL matrix committed");
        Ok(())
    }
}
