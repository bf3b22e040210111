use std::collections::HashSet;

use crate::types::EntityId;

/// Write-authority state for one (entity, component type) pair.
///
/// At most one worker holds `Authoritative` for a pair at any time.
/// `AuthorityLossImminent` means this worker is still the writer but
/// the remote authority service will revoke ownership soon, so writes
/// should be finalized. Absence of tracked state reads as
/// `NotAuthoritative`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Authority {
    Authoritative,
    AuthorityLossImminent,
    NotAuthoritative,
}

// AuthorityTracker
//
// Invariant: an entity is a member of at most one of the two sets.
pub(crate) struct AuthorityTracker {
    authoritative: HashSet<EntityId>,
    loss_imminent: HashSet<EntityId>,
}

impl AuthorityTracker {
    pub(crate) fn new() -> Self {
        Self {
            authoritative: HashSet::new(),
            loss_imminent: HashSet::new(),
        }
    }

    /// Apply an authority-changed event. All transitions are legal;
    /// setting the state already held is a no-op.
    pub(crate) fn set_state(&mut self, entity: EntityId, authority: Authority) {
        match authority {
            Authority::Authoritative => {
                self.authoritative.insert(entity);
                self.loss_imminent.remove(&entity);
            }
            Authority::AuthorityLossImminent => {
                self.loss_imminent.insert(entity);
                self.authoritative.remove(&entity);
            }
            Authority::NotAuthoritative => {
                self.authoritative.remove(&entity);
                self.loss_imminent.remove(&entity);
            }
        }
    }

    pub(crate) fn has_authority(&self, entity: &EntityId) -> bool {
        self.authoritative.contains(entity)
    }

    pub(crate) fn has_loss_imminent(&self, entity: &EntityId) -> bool {
        self.loss_imminent.contains(entity)
    }

    /// Drop all tracked state for `entity`.
    pub(crate) fn remove(&mut self, entity: &EntityId) {
        self.authoritative.remove(entity);
        self.loss_imminent.remove(entity);
    }

    /// Pick an arbitrary member of the authoritative set.
    pub(crate) fn random_authoritative(&self) -> Option<EntityId> {
        if self.authoritative.is_empty() {
            return None;
        }
        let index = fastrand::usize(..self.authoritative.len());
        self.authoritative.iter().nth(index).copied()
    }
}
