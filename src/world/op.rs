use std::any::Any;

use crate::{
    types::{EntityId, LogLevel},
    world::{
        authority::Authority,
        component::{Component, ComponentKind},
    },
};

/// One event pulled from the remote authority service's stream.
///
/// Component payloads are type-erased so that a single stream can carry
/// ops for every registered component type; the [`Dispatcher`] routes
/// them by [`ComponentKind`] and downcasts at the receiving map.
///
/// [`Dispatcher`]: crate::Dispatcher
pub enum WorldOp {
    AddComponent {
        entity: EntityId,
        kind: ComponentKind,
        data: Box<dyn Any + Send>,
    },
    UpdateComponent {
        entity: EntityId,
        kind: ComponentKind,
        update: Box<dyn Any + Send>,
    },
    /// Entity-wide removal: clears the entity from every registered map
    RemoveEntity { entity: EntityId },
    AuthorityChange {
        entity: EntityId,
        kind: ComponentKind,
        authority: Authority,
    },
    /// Log event forwarded from the remote side. `Fatal` severity makes
    /// the scheduler shut down.
    LogMessage { level: LogLevel, message: String },
    /// The remote side is asking for a load report this tick
    MetricsRequest,
}

impl WorldOp {
    pub fn add<C: Component + Send>(entity: EntityId, data: C) -> Self {
        Self::AddComponent {
            entity,
            kind: ComponentKind::of::<C>(),
            data: Box::new(data),
        }
    }

    pub fn update<C: Component>(entity: EntityId, update: C::Update) -> Self
    where
        C::Update: Send,
    {
        Self::UpdateComponent {
            entity,
            kind: ComponentKind::of::<C>(),
            update: Box::new(update),
        }
    }

    pub fn remove_entity(entity: EntityId) -> Self {
        Self::RemoveEntity { entity }
    }

    pub fn authority_change<C: Component>(entity: EntityId, authority: Authority) -> Self {
        Self::AuthorityChange {
            entity,
            kind: ComponentKind::of::<C>(),
            authority,
        }
    }

    pub fn log_message(level: LogLevel, message: impl Into<String>) -> Self {
        Self::LogMessage {
            level,
            message: message.into(),
        }
    }
}
