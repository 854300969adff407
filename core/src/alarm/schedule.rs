use crate::alarm::profile::AlarmProfile;
use serde::Serialize;

/// A single tone emission placed on the absolute timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledTone {
    pub at_ms: u64,
    pub offset_ms: u64,
    pub duration_ms: u64,
    pub frequency_hz: f32,
}

/// Maps a profile and a cycle start onto the emissions of one pattern cycle,
/// ordered by start time.
pub fn schedule_cycle(profile: &AlarmProfile, cycle_start_ms: u64) -> Vec<ScheduledTone> {
    profile
        .pattern
        .steps()
        .iter()
        .map(|step| ScheduledTone {
            at_ms: cycle_start_ms + step.offset_ms,
            offset_ms: step.offset_ms,
            duration_ms: step.duration_ms,
            frequency_hz: profile.frequency_hz * step.multiplier,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::profile::{AlarmCategory, Pattern};

    fn profile(pattern: Pattern, frequency_hz: f32) -> AlarmProfile {
        AlarmProfile {
            id: "test",
            name: "Test",
            category: AlarmCategory::General,
            frequency_hz,
            pattern,
        }
    }

    #[test]
    fn continuous_cycle_is_one_long_tone() {
        let tones = schedule_cycle(&profile(Pattern::Continuous, 2_000.0), 0);
        assert_eq!(tones.len(), 1);
        assert_eq!(tones[0].duration_ms, 2_000);
        assert_eq!(tones[0].frequency_hz, 2_000.0);
    }

    #[test]
    fn pulse_cycle_offsets_are_relative_to_start() {
        let tones = schedule_cycle(&profile(Pattern::Pulse, 800.0), 10_000);
        let starts: Vec<u64> = tones.iter().map(|t| t.at_ms).collect();
        assert_eq!(starts, vec![10_000, 10_300, 10_600]);
        assert!(tones.iter().all(|t| t.duration_ms == 200));
    }

    #[test]
    fn warble_raises_the_middle_tone() {
        let tones = schedule_cycle(&profile(Pattern::Warble, 1_500.0), 0);
        let freqs: Vec<f32> = tones.iter().map(|t| t.frequency_hz).collect();
        assert_eq!(freqs[0], 1_500.0);
        assert!((freqs[1] - 1_800.0).abs() < 1e-3);
        assert_eq!(freqs[2], 1_500.0);
        assert_eq!(tones[1].offset_ms, 350);
    }

    #[test]
    fn intermittent_cycle_has_two_half_second_tones() {
        let tones = schedule_cycle(&profile(Pattern::Intermittent, 1_000.0), 0);
        assert_eq!(tones.len(), 2);
        assert_eq!(tones[1].at_ms, 700);
        assert!(tones.iter().all(|t| t.duration_ms == 500));
    }
}
