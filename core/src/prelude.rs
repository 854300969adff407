use serde::{Deserialize, Serialize};

/// Default alarm volume applied to a fresh controller.
pub const DEFAULT_VOLUME: f32 = 0.7;
/// Interval between the starts of two consecutive pattern cycles.
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 2_500;
/// Radius inside which an incident counts as nearby.
pub const DEFAULT_ALERT_RADIUS_M: f64 = 5_000.0;
/// Maximum number of entries the nearby feed retains.
pub const DEFAULT_FEED_CAPACITY: usize = 5;
/// Critical incidents closer than this escalate to an audible alarm.
pub const DEFAULT_ESCALATION_DISTANCE_M: f64 = 1_000.0;

/// Shared configuration for the alarm controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub initial_volume: f32,
    pub repeat_interval_ms: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
        }
    }
}

/// Shared configuration for the proximity monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub alert_radius_m: f64,
    pub feed_capacity: usize,
    pub escalation_distance_m: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            alert_radius_m: DEFAULT_ALERT_RADIUS_M,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            escalation_distance_m: DEFAULT_ESCALATION_DISTANCE_M,
        }
    }
}

/// Common error type for the alerting core.
#[derive(thiserror::Error, Debug)]
pub enum AlertError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("buffer exhaustion: {0}")]
    BufferExhaustion(String),
}

pub type AlertResult<T> = Result<T, AlertError>;

/// Clamps a requested volume into `[0, 1]`. NaN maps to silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_volume_bounds_values() {
        assert_eq!(clamp_volume(-0.5), 0.0);
        assert_eq!(clamp_volume(1.7), 1.0);
        assert_eq!(clamp_volume(0.25), 0.25);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
    }

    #[test]
    fn configs_default_to_documented_values() {
        let alarm = AlarmConfig::default();
        assert_eq!(alarm.repeat_interval_ms, 2_500);
        let proximity = ProximityConfig::default();
        assert_eq!(proximity.alert_radius_m, 5_000.0);
        assert_eq!(proximity.feed_capacity, 5);
    }
}
