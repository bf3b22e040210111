use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Bounded-window moving average of recent tick durations, in
/// milliseconds.
///
/// Recorded on the tick thread and read from wherever the load report
/// is produced, so the (sum, window) pair lives behind one mutex and is
/// only ever touched as a unit. The running sum is maintained
/// incrementally; retrieval is O(1).
#[derive(Clone)]
pub struct RollingMetric {
    data: Arc<Mutex<MetricData>>,
}

struct MetricData {
    total: f64,
    values: VecDeque<f64>,
    size: usize,
}

impl RollingMetric {
    pub fn new(size: usize) -> Self {
        Self {
            data: Arc::new(Mutex::new(MetricData {
                total: 0.0,
                values: VecDeque::with_capacity(size + 1),
                size,
            })),
        }
    }

    /// Append a sample, evicting the oldest once the window is full.
    pub fn record(&self, value: f64) {
        let Ok(mut data) = self.data.lock() else {
            return;
        };
        data.total += value;
        data.values.push_back(value);
        while data.values.len() > data.size {
            if let Some(evicted) = data.values.pop_front() {
                data.total -= evicted;
            }
        }
    }

    /// Current window average, or 0.0 when no samples exist.
    pub fn average(&self) -> f64 {
        let Ok(data) = self.data.lock() else {
            return 0.0;
        };
        if data.values.is_empty() {
            return 0.0;
        }
        data.total / data.values.len() as f64
    }
}
