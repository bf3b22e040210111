use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    types::EntityId,
    world::{
        authority::{Authority, AuthorityTracker},
        component::Component,
        error::StoreError,
    },
};

/// Op kinds a [`ComponentMap`] reacts to when registered with a
/// [`Dispatcher`]. Defaults to all four; a read-only map can mask out
/// the kinds it does not care about.
///
/// [`Dispatcher`]: crate::Dispatcher
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapEvents(u8);

impl MapEvents {
    pub const ADD: Self = Self(1);
    pub const UPDATE: Self = Self(1 << 1);
    pub const REMOVE: Self = Self(1 << 2);
    pub const AUTHORITY: Self = Self(1 << 3);

    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for MapEvents {
    fn default() -> Self {
        Self::ALL
    }
}

/// Local replication cache for one component type.
///
/// Holds the last known value for every in-scope entity and applies
/// incoming ops under the single-writer authority invariant: an update
/// is never merged while this worker is authoritative for the entity,
/// so a stale remote echo cannot clobber a locally authoritative write.
///
/// The map is a cloneable handle over shared state, so the
/// [`Dispatcher`] can keep applying drained ops while behaviours hold
/// their own handles for reading. Mutation happens only on the tick
/// thread; the lock exists to make the handles shareable, not to
/// arbitrate writers.
///
/// [`Dispatcher`]: crate::Dispatcher
pub struct ComponentMap<C: Component> {
    data: Arc<RwLock<ComponentMapData<C>>>,
}

impl<C: Component> Clone for ComponentMap<C> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

struct ComponentMapData<C> {
    components: HashMap<EntityId, C>,
    authority: AuthorityTracker,
    // One-shot "changed since last acknowledgment" flag. Starts true so
    // a freshly registered map reports pending state until first acked.
    has_updated: bool,
}

impl<C: Component> Default for ComponentMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentMap<C> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(ComponentMapData {
                components: HashMap::new(),
                authority: AuthorityTracker::new(),
                has_updated: true,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ComponentMapData<C>> {
        let Ok(data) = self.data.as_ref().read() else {
            panic!("ComponentMap lock is held by current thread");
        };
        data
    }

    fn try_write(&self) -> Result<RwLockWriteGuard<'_, ComponentMapData<C>>, StoreError> {
        self.data.as_ref().write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Apply a component-added op, inserting or overwriting the stored
    /// value. A duplicate add is treated as the latest snapshot, not an
    /// error.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_apply_add` for non-panicking error handling.
    pub fn apply_add(&self, entity: EntityId, data: C) {
        self.try_apply_add(entity, data)
            .expect("ComponentMap lock is held by current thread");
    }

    /// Apply a component-added op (non-panicking version).
    pub fn try_apply_add(&self, entity: EntityId, data: C) -> Result<(), StoreError> {
        let mut map = self.try_write()?;
        map.components.insert(entity, data);
        map.has_updated = true;
        Ok(())
    }

    /// Apply a component-updated op, merging the delta into the stored
    /// value in place.
    ///
    /// The update is silently dropped when the entity has no stored
    /// value (no out-of-order buffering) or when this worker is
    /// authoritative for it (authority invariant). A dropped delta is
    /// permanently lost; senders needing last-value guarantees must
    /// resend.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_apply_update` for non-panicking error handling.
    pub fn apply_update(&self, entity: EntityId, update: C::Update) {
        self.try_apply_update(entity, update)
            .expect("ComponentMap lock is held by current thread");
    }

    /// Apply a component-updated op (non-panicking version).
    pub fn try_apply_update(&self, entity: EntityId, update: C::Update) -> Result<(), StoreError> {
        let mut map = self.try_write()?;
        if map.authority.has_authority(&entity) {
            return Ok(());
        }
        if let Some(component) = map.components.get_mut(&entity) {
            component.apply_update(update);
            map.has_updated = true;
        }
        Ok(())
    }

    /// Apply an entity-removed op, clearing the stored value and any
    /// authority-set membership. No-op when the entity is unknown.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_apply_remove` for non-panicking error handling.
    pub fn apply_remove(&self, entity: EntityId) {
        self.try_apply_remove(entity)
            .expect("ComponentMap lock is held by current thread");
    }

    /// Apply an entity-removed op (non-panicking version).
    pub fn try_apply_remove(&self, entity: EntityId) -> Result<(), StoreError> {
        let mut map = self.try_write()?;
        if map.components.remove(&entity).is_some() {
            map.has_updated = true;
        }
        map.authority.remove(&entity);
        Ok(())
    }

    /// Apply an authority-changed op. Idempotent; may arrive before any
    /// add for the same entity (no ordering is enforced between the two
    /// event families).
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_apply_authority_change` for non-panicking
    /// error handling.
    pub fn apply_authority_change(&self, entity: EntityId, authority: Authority) {
        self.try_apply_authority_change(entity, authority)
            .expect("ComponentMap lock is held by current thread");
    }

    /// Apply an authority-changed op (non-panicking version).
    pub fn try_apply_authority_change(
        &self,
        entity: EntityId,
        authority: Authority,
    ) -> Result<(), StoreError> {
        let mut map = self.try_write()?;
        map.authority.set_state(entity, authority);
        Ok(())
    }

    /// Last known value for `entity`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_get` for non-panicking error handling.
    pub fn get(&self, entity: &EntityId) -> Option<C>
    where
        C: Clone,
    {
        self.try_get(entity)
            .expect("ComponentMap lock is held by current thread")
    }

    /// Last known value for `entity` (non-panicking version).
    pub fn try_get(&self, entity: &EntityId) -> Result<Option<C>, StoreError>
    where
        C: Clone,
    {
        let map = self.data.as_ref().read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.components.get(entity).cloned())
    }

    pub fn contains_key(&self, entity: &EntityId) -> bool {
        self.read().components.contains_key(entity)
    }

    /// Does this worker hold exclusive write authority over `entity`
    /// for this component type? False for unknown entities.
    pub fn has_authority(&self, entity: &EntityId) -> bool {
        self.read().authority.has_authority(entity)
    }

    /// Is authority over `entity` about to be revoked? False for
    /// unknown entities.
    pub fn has_authority_loss_imminent(&self, entity: &EntityId) -> bool {
        self.read().authority.has_loss_imminent(entity)
    }

    /// Has the map changed since the last [`acknowledge`]? Accepted
    /// adds, updates, and removes set this; authority changes do not.
    ///
    /// [`acknowledge`]: ComponentMap::acknowledge
    pub fn has_changed(&self) -> bool {
        self.read().has_updated
    }

    /// Clear the change notification. Idempotent; clears only the flag,
    /// never any stored state.
    pub fn acknowledge(&self) {
        let Ok(mut map) = self.data.as_ref().write() else {
            panic!("ComponentMap lock is held by current thread");
        };
        map.has_updated = false;
    }

    /// Pick an arbitrary entity this worker is authoritative over, for
    /// load-spreading or sampling. `None` when the set is empty.
    pub fn random_authoritative(&self) -> Option<EntityId> {
        self.read().authority.random_authoritative()
    }

    /// Ids of all entities with a stored value.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.read().components.keys().copied().collect()
    }

    /// Snapshot of all stored (id, value) pairs.
    pub fn entries(&self) -> Vec<(EntityId, C)>
    where
        C: Clone,
    {
        self.read()
            .components
            .iter()
            .map(|(id, component)| (*id, component.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().components.is_empty()
    }
}
