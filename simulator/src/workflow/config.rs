use alertcore::prelude::{
    AlarmConfig, ProximityConfig, DEFAULT_ALERT_RADIUS_M, DEFAULT_ESCALATION_DISTANCE_M,
    DEFAULT_FEED_CAPACITY, DEFAULT_REPEAT_INTERVAL_MS, DEFAULT_VOLUME,
};
use alertcore::synthesis::DEFAULT_SAMPLE_RATE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub alert_radius_m: f64,
    pub escalation_distance_m: f64,
    pub feed_capacity: usize,
    pub volume: f32,
    pub repeat_interval_ms: u64,
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    /// Largest per-poll move of the simulated observer; 0 keeps it fixed.
    pub walk_step_deg: f64,
    pub scan_interval_ms: u64,
    pub detection_probability: f64,
    pub jitter_deg: f64,
    pub tick_ms: u64,
    pub seed: u64,
    pub sample_rate: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            alert_radius_m: DEFAULT_ALERT_RADIUS_M,
            escalation_distance_m: DEFAULT_ESCALATION_DISTANCE_M,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            volume: DEFAULT_VOLUME,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
            origin_latitude: 40.7128,
            origin_longitude: -74.0060,
            walk_step_deg: 0.0002,
            scan_interval_ms: 10_000,
            detection_probability: 0.05,
            jitter_deg: 0.01,
            tick_ms: 50,
            seed: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading monitor config {}", path_ref.display()))?;
        let config: MonitorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing monitor config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        alert_radius_m: f64,
        volume: f32,
        seed: u64,
        origin_latitude: f64,
        origin_longitude: f64,
    ) -> Self {
        Self {
            alert_radius_m,
            volume,
            seed,
            origin_latitude,
            origin_longitude,
            ..Default::default()
        }
    }

    pub fn to_alarm_config(&self) -> AlarmConfig {
        AlarmConfig {
            initial_volume: self.volume,
            repeat_interval_ms: self.repeat_interval_ms,
        }
    }

    pub fn to_proximity_config(&self) -> ProximityConfig {
        ProximityConfig {
            alert_radius_m: self.alert_radius_m,
            feed_capacity: self.feed_capacity,
            escalation_distance_m: self.escalation_distance_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_core_configs() {
        let cfg = MonitorConfig::from_args(2_500.0, 0.4, 7, 51.5, -0.12);
        assert_eq!(cfg.to_proximity_config().alert_radius_m, 2_500.0);
        assert_eq!(cfg.to_alarm_config().initial_volume, 0.4);
        assert_eq!(cfg.to_alarm_config().repeat_interval_ms, 2_500);
        assert_eq!(cfg.scan_interval_ms, 10_000);
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"alert_radius_m: 1200.0\nseed: 9\ndetection_probability: 0.5\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = MonitorConfig::load(&path).unwrap();
        assert_eq!(cfg.alert_radius_m, 1_200.0);
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.feed_capacity, 5);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = MonitorConfig::load("/nonexistent/monitor.yaml").unwrap_err();
        assert!(err.to_string().contains("reading monitor config"));
    }
}
