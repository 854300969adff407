use crate::prelude::{AlertError, AlertResult};
use serde::{Deserialize, Serialize};

/// Alarm category, also used to pick a catalog profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmCategory {
    Fire,
    Medical,
    Security,
    Evacuation,
    General,
}

/// Temporal shape of one pattern cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pattern {
    Continuous,
    Intermittent,
    Pulse,
    Warble,
}

/// One step of a pattern: start offset, duration, frequency multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternStep {
    pub offset_ms: u64,
    pub duration_ms: u64,
    pub multiplier: f32,
}

const fn step(offset_ms: u64, duration_ms: u64, multiplier: f32) -> PatternStep {
    PatternStep {
        offset_ms,
        duration_ms,
        multiplier,
    }
}

static CONTINUOUS_STEPS: [PatternStep; 1] = [step(0, 2_000, 1.0)];
static INTERMITTENT_STEPS: [PatternStep; 2] = [step(0, 500, 1.0), step(700, 500, 1.0)];
static PULSE_STEPS: [PatternStep; 3] = [
    step(0, 200, 1.0),
    step(300, 200, 1.0),
    step(600, 200, 1.0),
];
static WARBLE_STEPS: [PatternStep; 3] = [
    step(0, 300, 1.0),
    step(350, 300, 1.2),
    step(700, 300, 1.0),
];

impl Pattern {
    /// Steps in non-decreasing offset order.
    pub fn steps(self) -> &'static [PatternStep] {
        match self {
            Pattern::Continuous => &CONTINUOUS_STEPS,
            Pattern::Intermittent => &INTERMITTENT_STEPS,
            Pattern::Pulse => &PULSE_STEPS,
            Pattern::Warble => &WARBLE_STEPS,
        }
    }

    /// Time from cycle start until the last step has finished.
    pub fn span_ms(self) -> u64 {
        self.steps()
            .iter()
            .map(|s| s.offset_ms + s.duration_ms)
            .max()
            .unwrap_or(0)
    }
}

/// Immutable descriptor of an alarm's pitch and pattern.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AlarmProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub category: AlarmCategory,
    pub frequency_hz: f32,
    pub pattern: Pattern,
}

/// Fixed catalog loaded at startup. The first entry is the fallback.
pub const CATALOG: [AlarmProfile; 5] = [
    AlarmProfile {
        id: "fire",
        name: "Fire Alarm",
        category: AlarmCategory::Fire,
        frequency_hz: 3_000.0,
        pattern: Pattern::Intermittent,
    },
    AlarmProfile {
        id: "medical",
        name: "Medical Emergency",
        category: AlarmCategory::Medical,
        frequency_hz: 800.0,
        pattern: Pattern::Pulse,
    },
    AlarmProfile {
        id: "security",
        name: "Security Alert",
        category: AlarmCategory::Security,
        frequency_hz: 1_500.0,
        pattern: Pattern::Warble,
    },
    AlarmProfile {
        id: "evacuation",
        name: "Evacuation Signal",
        category: AlarmCategory::Evacuation,
        frequency_hz: 2_000.0,
        pattern: Pattern::Continuous,
    },
    AlarmProfile {
        id: "general",
        name: "General Alert",
        category: AlarmCategory::General,
        frequency_hz: 1_000.0,
        pattern: Pattern::Intermittent,
    },
];

impl AlarmProfile {
    pub fn catalog() -> &'static [AlarmProfile] {
        &CATALOG
    }

    /// Catalog profile for `category`, falling back to the first entry.
    pub fn for_category(category: AlarmCategory) -> AlarmProfile {
        CATALOG
            .iter()
            .find(|profile| profile.category == category)
            .copied()
            .unwrap_or(CATALOG[0])
    }

    pub fn by_id(id: &str) -> Option<AlarmProfile> {
        CATALOG.iter().find(|profile| profile.id == id).copied()
    }

    pub fn validate(&self) -> AlertResult<()> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(AlertError::InvalidProfile(format!(
                "{} has non-positive frequency {}",
                self.id, self.frequency_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_resolves_to_matching_profile() {
        for category in [
            AlarmCategory::Fire,
            AlarmCategory::Medical,
            AlarmCategory::Security,
            AlarmCategory::Evacuation,
            AlarmCategory::General,
        ] {
            assert_eq!(AlarmProfile::for_category(category).category, category);
        }
    }

    #[test]
    fn catalog_profiles_validate() {
        assert!(AlarmProfile::catalog().iter().all(|p| p.validate().is_ok()));
        let broken = AlarmProfile {
            frequency_hz: 0.0,
            ..CATALOG[0]
        };
        assert!(matches!(
            broken.validate(),
            Err(AlertError::InvalidProfile(_))
        ));
    }

    #[test]
    fn pattern_steps_are_ordered_and_fit_the_repeat_interval() {
        for pattern in [
            Pattern::Continuous,
            Pattern::Intermittent,
            Pattern::Pulse,
            Pattern::Warble,
        ] {
            let steps = pattern.steps();
            assert!(steps.windows(2).all(|w| w[0].offset_ms <= w[1].offset_ms));
            assert!(pattern.span_ms() < crate::prelude::DEFAULT_REPEAT_INTERVAL_MS);
        }
    }

    #[test]
    fn category_serializes_in_upper_case() {
        let json = serde_json::to_string(&AlarmCategory::Evacuation).unwrap();
        assert_eq!(json, "\"EVACUATION\"");
        assert_eq!(AlarmProfile::by_id("security").unwrap().pattern, Pattern::Warble);
    }
}
