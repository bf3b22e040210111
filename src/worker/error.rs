use thiserror::Error;

/// Failure raised by a [`TickBehaviour`] during one tick.
///
/// Caught at the call site in the tick loop, logged with the
/// behaviour's name, and never propagated further; fault isolation is
/// per-behaviour, not per-tick.
///
/// [`TickBehaviour`]: crate::TickBehaviour
#[derive(Debug, Error)]
pub enum BehaviourError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Misuse of the worker lifecycle. Never produced during a running
/// loop; `run` itself returns only on graceful or fatal termination.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    /// `run` was called on a worker that has already run to completion
    #[error("Worker [{worker_id}] has already run; the stopped state is terminal")]
    AlreadyRan { worker_id: String },

    /// Behaviour registration after the loop started, or reusing a name
    #[error("Cannot register behaviour [{name}]: {reason}")]
    BehaviourRegistration { name: String, reason: &'static str },
}
