use std::{any::Any, collections::HashMap};

use log::{debug, error, info, warn};

use crate::{
    types::{EntityId, LogLevel},
    world::{
        authority::Authority,
        component::{Component, ComponentKind},
        component_map::{ComponentMap, MapEvents},
        error::StoreError,
        op::WorldOp,
    },
};

// Type-erased view of a registered ComponentMap, so one routing table
// can hold maps of every component type. Payloads are borrowed and
// cloned per sink, so several maps registered for the same kind each
// receive the op.
trait OpSink {
    fn events(&self) -> MapEvents;
    fn apply_add(&self, entity: EntityId, data: &dyn Any) -> Result<(), StoreError>;
    fn apply_update(&self, entity: EntityId, update: &dyn Any) -> Result<(), StoreError>;
    fn apply_remove(&self, entity: EntityId) -> Result<(), StoreError>;
    fn apply_authority_change(
        &self,
        entity: EntityId,
        authority: Authority,
    ) -> Result<(), StoreError>;
}

struct RegisteredMap<C: Component> {
    map: ComponentMap<C>,
    events: MapEvents,
}

impl<C: Component> RegisteredMap<C> {
    fn mismatch(entity: EntityId) -> StoreError {
        StoreError::PayloadTypeMismatch {
            entity_id: entity.to_string(),
            component_kind: format!("{:?}", ComponentKind::of::<C>()),
        }
    }
}

impl<C> OpSink for RegisteredMap<C>
where
    C: Component + Clone,
    C::Update: Clone,
{
    fn events(&self) -> MapEvents {
        self.events
    }

    fn apply_add(&self, entity: EntityId, data: &dyn Any) -> Result<(), StoreError> {
        let data = data.downcast_ref::<C>().ok_or_else(|| Self::mismatch(entity))?;
        self.map.try_apply_add(entity, data.clone())
    }

    fn apply_update(&self, entity: EntityId, update: &dyn Any) -> Result<(), StoreError> {
        let update = update
            .downcast_ref::<C::Update>()
            .ok_or_else(|| Self::mismatch(entity))?;
        self.map.try_apply_update(entity, update.clone())
    }

    fn apply_remove(&self, entity: EntityId) -> Result<(), StoreError> {
        self.map.try_apply_remove(entity)
    }

    fn apply_authority_change(
        &self,
        entity: EntityId,
        authority: Authority,
    ) -> Result<(), StoreError> {
        self.map.try_apply_authority_change(entity, authority)
    }
}

/// Summary of one drained batch, handed back to the scheduler so it
/// can react without reaching into any global state.
#[derive(Debug, Default)]
pub struct DrainSummary {
    pub op_count: usize,
    /// Message of the first fatal-severity log op seen, if any
    pub fatal: Option<String>,
    /// Whether the remote side asked for a load report
    pub metrics_requested: bool,
}

impl DrainSummary {
    pub fn merge(&mut self, other: DrainSummary) {
        self.op_count += other.op_count;
        if self.fatal.is_none() {
            self.fatal = other.fatal;
        }
        self.metrics_requested |= other.metrics_requested;
    }
}

/// Routes drained [`WorldOp`]s to the [`ComponentMap`]s registered for
/// their component kind. Entity removals fan out to every map; log and
/// metrics ops are folded into the returned [`DrainSummary`].
///
/// Registration is expected to happen once, while the worker is being
/// assembled; after that the dispatcher is driven solely from the tick
/// loop.
pub struct Dispatcher {
    maps: HashMap<ComponentKind, Vec<Box<dyn OpSink>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            maps: HashMap::new(),
        }
    }

    /// Register a map handle to receive ops for its component type,
    /// filtered by `events`. Several maps may register for the same
    /// type; each receives every op the mask lets through.
    pub fn register<C>(&mut self, map: &ComponentMap<C>, events: MapEvents)
    where
        C: Component + Clone,
        C::Update: Clone,
    {
        self.maps
            .entry(ComponentKind::of::<C>())
            .or_default()
            .push(Box::new(RegisteredMap {
                map: map.clone(),
                events,
            }));
    }

    /// Apply a batch of ops in delivery order.
    ///
    /// Ops for unregistered component kinds are dropped quietly (the
    /// worker is simply not interested in them). Store-level failures
    /// are logged and never abort the rest of the batch.
    pub fn process(&mut self, ops: Vec<WorldOp>) -> DrainSummary {
        let mut summary = DrainSummary {
            op_count: ops.len(),
            ..DrainSummary::default()
        };

        for op in ops {
            match op {
                WorldOp::AddComponent { entity, kind, data } => {
                    for sink in self.sinks_for(&kind, MapEvents::ADD) {
                        if let Err(e) = sink.apply_add(entity, data.as_ref()) {
                            error!("Failed to apply add for entity {entity}: {e}");
                        }
                    }
                }
                WorldOp::UpdateComponent {
                    entity,
                    kind,
                    update,
                } => {
                    for sink in self.sinks_for(&kind, MapEvents::UPDATE) {
                        if let Err(e) = sink.apply_update(entity, update.as_ref()) {
                            error!("Failed to apply update for entity {entity}: {e}");
                        }
                    }
                }
                WorldOp::RemoveEntity { entity } => {
                    for sink in self.maps.values().flatten() {
                        if !sink.events().contains(MapEvents::REMOVE) {
                            continue;
                        }
                        if let Err(e) = sink.apply_remove(entity) {
                            error!("Failed to apply removal of entity {entity}: {e}");
                        }
                    }
                }
                WorldOp::AuthorityChange {
                    entity,
                    kind,
                    authority,
                } => {
                    for sink in self.sinks_for(&kind, MapEvents::AUTHORITY) {
                        if let Err(e) = sink.apply_authority_change(entity, authority) {
                            error!("Failed to apply authority change for entity {entity}: {e}");
                        }
                    }
                }
                WorldOp::LogMessage { level, message } => match level {
                    LogLevel::Debug => debug!("[remote] {message}"),
                    LogLevel::Info => info!("[remote] {message}"),
                    LogLevel::Warn => warn!("[remote] {message}"),
                    LogLevel::Error => error!("[remote] {message}"),
                    LogLevel::Fatal => {
                        error!("[remote] fatal: {message}");
                        if summary.fatal.is_none() {
                            summary.fatal = Some(message);
                        }
                    }
                },
                WorldOp::MetricsRequest => {
                    summary.metrics_requested = true;
                }
            }
        }

        summary
    }

    fn sinks_for<'a>(
        &'a self,
        kind: &ComponentKind,
        event: MapEvents,
    ) -> impl Iterator<Item = &'a dyn OpSink> + 'a {
        self.maps
            .get(kind)
            .into_iter()
            .flatten()
            .map(|sink| sink.as_ref())
            .filter(move |sink| sink.events().contains(event))
    }
}
