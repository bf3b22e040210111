use std::{
    thread,
    time::{Duration, Instant},
};

use indexmap::IndexMap;
use log::{error, info, warn};

use crate::{
    connection::event_source::EventSource,
    worker::{
        behaviour::TickBehaviour,
        config::WorkerConfig,
        error::WorkerError,
        rolling_metric::RollingMetric,
    },
    world::dispatcher::{Dispatcher, DrainSummary},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    NotStarted,
    Running,
    /// Terminal; a stopped worker cannot be restarted
    Stopped,
}

/// Why [`TickWorker::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// The event source's connected signal went false between ticks
    Disconnected,
    /// A fatal-severity remote log event triggered an orderly shutdown
    Fatal,
}

/// Drives the simulation loop at a fixed cadence.
///
/// One iteration: drain pending ops (re-draining while the remote side
/// is mid critical section), run every registered behaviour once in
/// registration order with per-behaviour fault isolation, answer any
/// load-report request, record the tick duration, then sleep away the
/// remaining budget. Overruns are logged but never compensated for:
/// no catch-up ticks, no coalescing.
pub struct TickWorker<S: EventSource> {
    worker_type: String,
    worker_id: String,
    config: WorkerConfig,
    event_source: S,
    dispatcher: Dispatcher,
    behaviours: IndexMap<String, Box<dyn TickBehaviour>>,
    tick_metric: RollingMetric,
    state: WorkerState,
}

impl<S: EventSource> TickWorker<S> {
    pub fn new(
        worker_type: impl Into<String>,
        worker_id: impl Into<String>,
        config: WorkerConfig,
        event_source: S,
        dispatcher: Dispatcher,
    ) -> Self {
        let tick_metric = RollingMetric::new(config.metric_window);
        Self {
            worker_type: worker_type.into(),
            worker_id: worker_id.into(),
            config,
            event_source,
            dispatcher,
            behaviours: IndexMap::new(),
            tick_metric,
            state: WorkerState::NotStarted,
        }
    }

    /// Register a named behaviour. Membership is static: registration
    /// is only possible before the loop starts, and names are unique.
    pub fn register_behaviour(
        &mut self,
        name: impl Into<String>,
        behaviour: Box<dyn TickBehaviour>,
    ) -> Result<(), WorkerError> {
        let name = name.into();
        if self.state != WorkerState::NotStarted {
            return Err(WorkerError::BehaviourRegistration {
                name,
                reason: "the loop has already started",
            });
        }
        if self.behaviours.contains_key(&name) {
            return Err(WorkerError::BehaviourRegistration {
                name,
                reason: "a behaviour with this name is already registered",
            });
        }
        self.behaviours.insert(name, behaviour);
        Ok(())
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn worker_type(&self) -> &str {
        &self.worker_type
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Shared handle to the rolling tick-duration metric.
    pub fn tick_metric(&self) -> RollingMetric {
        self.tick_metric.clone()
    }

    pub fn event_source(&self) -> &S {
        &self.event_source
    }

    /// Run the loop until disconnection or fatal shutdown. Returns an
    /// error only when called on a worker that has already run.
    pub fn run(&mut self) -> Result<WorkerExit, WorkerError> {
        if self.state != WorkerState::NotStarted {
            return Err(WorkerError::AlreadyRan {
                worker_id: self.worker_id.clone(),
            });
        }
        self.state = WorkerState::Running;
        info!(
            "Worker [{}] of type [{}] entering tick loop ({} behaviours)",
            self.worker_id,
            self.worker_type,
            self.behaviours.len()
        );

        let tick_ms = self.config.tick_interval.as_secs_f64() * 1000.0;
        let threshold_ms = self.config.sleep_threshold.as_secs_f64() * 1000.0;

        while self.event_source.is_connected() {
            let frame_start = Instant::now();

            // process ops
            let summary = self.fetch_and_process(0);
            if let Some(message) = summary.fatal {
                error!("Worker [{}] received fatal remote event: {message}", self.worker_id);
                self.shutdown();
                return Ok(WorkerExit::Fatal);
            }

            // process behaviours
            for (name, behaviour) in self.behaviours.iter_mut() {
                if let Err(e) = behaviour.tick() {
                    error!("Caught failure during tick for behaviour [{name}]: {e}");
                }
            }

            if summary.metrics_requested {
                let load = self.current_load();
                self.event_source.send_load(load);
            }

            self.tick_metric
                .record(frame_start.elapsed().as_secs_f64() * 1000.0);

            // wait for the next frame to ensure the tick rate isn't too fast
            let wait_ms = tick_ms - frame_start.elapsed().as_secs_f64() * 1000.0;
            if wait_ms > threshold_ms {
                thread::sleep(Duration::from_millis(wait_ms.floor() as u64));
            } else if wait_ms < -threshold_ms {
                warn!("Worker [{}] fell behind by {:.1}ms", self.worker_id, -wait_ms);
            }
        }

        self.state = WorkerState::Stopped;
        info!("Worker [{}] disconnected; loop stopped", self.worker_id);
        Ok(WorkerExit::Disconnected)
    }

    /// Drain pending ops with the given timeout, then keep draining
    /// with a zero timeout while the remote side signals a critical
    /// section, so behaviours never observe a partially applied span.
    fn fetch_and_process(&mut self, timeout_ms: u32) -> DrainSummary {
        let ops = self.event_source.drain(timeout_ms);
        let mut summary = self.dispatcher.process(ops);
        while self.event_source.in_critical_section() {
            let ops = self.event_source.drain(0);
            summary.merge(self.dispatcher.process(ops));
        }
        summary
    }

    /// Simulated load as a fraction of the tick budget. An average tick
    /// over budget reports `1.0 + overrun / budget`.
    pub fn current_load(&self) -> f64 {
        let tick_ms = self.config.tick_interval.as_secs_f64() * 1000.0;
        let avg_sleep_ms = tick_ms - self.tick_metric.average();
        if avg_sleep_ms < 0.0 {
            1.0 + (-avg_sleep_ms) / tick_ms
        } else {
            (tick_ms - avg_sleep_ms) / tick_ms
        }
    }

    fn shutdown(&mut self) {
        self.event_source.dispose();
        self.state = WorkerState::Stopped;
        info!("Worker [{}] shut down; connection resources released", self.worker_id);
    }
}
