use std::fmt;

/// Identifier for an entity in the shared simulation pool.
///
/// Opaque, stable, and totally ordered. Never reused while an entity is
/// live. An `EntityId` carries no ownership information by itself; write
/// authority is tracked per component type by each [`ComponentMap`].
///
/// [`ComponentMap`]: crate::ComponentMap
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(i64);

impl EntityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a log event forwarded by the remote authority service.
///
/// `Fatal` is special: the scheduler treats it as an orderly-shutdown
/// signal (see [`TickWorker::run`]).
///
/// [`TickWorker::run`]: crate::TickWorker::run
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}
