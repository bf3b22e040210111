use crate::world::op::WorldOp;

/// Seam to the transport/connection layer that produces the remote op
/// stream and accepts outgoing reports.
///
/// The tick loop is the only caller. Implementations are expected to
/// honour the timeout as an upper bound on blocking; a zero timeout
/// must be a non-blocking poll. Passed into [`TickWorker`] at
/// construction; there is no ambient global connection.
///
/// [`TickWorker`]: crate::TickWorker
pub trait EventSource {
    /// Pull the next batch of pending ops, waiting at most
    /// `timeout_ms`. May return an empty batch.
    fn drain(&mut self, timeout_ms: u32) -> Vec<WorldOp>;

    /// True while the remote side is mid critical section: a span of
    /// related ops that must all be applied before behaviours run.
    fn in_critical_section(&self) -> bool;

    /// Gates the scheduler's main loop.
    fn is_connected(&self) -> bool;

    /// Report the worker's simulated load back to the authority
    /// service. `load` is a fraction of the tick budget; values above
    /// 1.0 mean the worker is consistently over budget.
    fn send_load(&mut self, load: f64);

    /// Release owned connection resources. Called once during orderly
    /// shutdown after a fatal remote log event.
    fn dispose(&mut self);
}
