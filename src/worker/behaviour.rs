use crate::worker::error::BehaviourError;

/// A named unit of simulation logic run once per tick.
///
/// Behaviours run strictly in registration order on the tick thread, so
/// a later behaviour always observes the effects of an earlier one
/// within the same tick. Returning an error does not abort the tick or
/// the remaining behaviours; the scheduler logs it against the
/// behaviour's name and moves on.
pub trait TickBehaviour {
    fn tick(&mut self) -> Result<(), BehaviourError>;
}
