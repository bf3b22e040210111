//! # Shoal
//! Client-side replication cache and tick scheduler for worker
//! processes in a distributed, tick-driven simulation.
//!
//! A worker observes and mutates a slice of a shared entity pool. The
//! remote authority service streams lifecycle and ownership ops; a
//! [`Dispatcher`] applies them to per-component-type [`ComponentMap`]s
//! under a single-writer authority invariant, and a [`TickWorker`]
//! drives registered [`TickBehaviour`]s at a fixed cadence, reporting
//! simulated load back through the [`EventSource`].

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod connection;
mod types;
mod worker;
mod world;

pub use connection::event_source::EventSource;
pub use types::{EntityId, LogLevel};
pub use worker::{
    behaviour::TickBehaviour,
    config::WorkerConfig,
    error::{BehaviourError, WorkerError},
    rolling_metric::RollingMetric,
    tick_worker::{TickWorker, WorkerExit, WorkerState},
};
pub use world::{
    authority::Authority,
    component::{Component, ComponentKind},
    component_map::{ComponentMap, MapEvents},
    dispatcher::{Dispatcher, DrainSummary},
    error::StoreError,
    op::WorldOp,
};
