use log::{debug, info, warn};
use serde::Serialize;

/// Component-tagged front end over the `log` facade.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.component, message);
    }

    pub fn degraded(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }

    /// Emits a structured event as a single JSON line.
    pub fn event<T: Serialize>(&self, kind: &str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => info!("[{}] {} {}", self.component, kind, json),
            Err(err) => warn!("[{}] {} <unserializable: {}>", self.component, kind, err),
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("alertcore")
    }
}
