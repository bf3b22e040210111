use std::time::Duration;

/// Tuning knobs for the tick loop, set once at construction.
pub struct WorkerConfig {
    /// Target period of one tick. The loop sleeps away whatever part of
    /// this budget the tick did not use.
    pub tick_interval: Duration,
    /// Number of recent tick durations kept by the rolling load metric.
    pub metric_window: usize,
    /// Remainders smaller than this are not worth a sleep; overruns
    /// beyond it trigger the fell-behind warning.
    pub sleep_threshold: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            metric_window: 30,
            sleep_threshold: Duration::from_millis(10),
        }
    }
}
