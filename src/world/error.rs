use thiserror::Error;

/// Errors surfaced by the replication store and op routing.
///
/// Rejected mutations (update on an authoritative entity, update on an
/// absent entity, redundant authority set) are expected races in a
/// replicated system and are silently dropped, never reported here.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A type-erased op payload did not downcast to the component type
    /// of the map it was routed to
    #[error("Op payload for entity {entity_id} does not match component kind {component_kind}")]
    PayloadTypeMismatch {
        entity_id: String,
        component_kind: String,
    },

    /// A thread panicked while holding the map lock
    #[error("ComponentMap lock poisoned")]
    LockPoisoned,
}
