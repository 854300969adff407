use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub tones_emitted: usize,
    pub alarm_cycles: usize,
    pub incidents_evaluated: usize,
    pub incidents_retained: usize,
    pub escalations: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_tone(&self) {
        self.update(|m| m.tones_emitted += 1);
    }

    pub fn record_cycle(&self) {
        self.update(|m| m.alarm_cycles += 1);
    }

    pub fn record_evaluated(&self) {
        self.update(|m| m.incidents_evaluated += 1);
    }

    pub fn record_retained(&self) {
        self.update(|m| m.incidents_retained += 1);
    }

    pub fn record_escalation(&self) {
        self.update(|m| m.escalations += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
