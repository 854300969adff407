use serde::Serialize;

/// Linear attack followed by an exponential decay toward a small floor.
///
/// The decay reaches `floor` exactly at the end of the tone, so adjacent tones
/// start and stop without an audible click.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Envelope {
    pub attack_ms: f32,
    pub floor: f32,
}

pub const DEFAULT_ATTACK_MS: f32 = 100.0;
pub const DEFAULT_FLOOR: f32 = 0.001;

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack_ms: DEFAULT_ATTACK_MS,
            floor: DEFAULT_FLOOR,
        }
    }
}

impl Envelope {
    /// Gain at `t_ms` into a tone of `duration_ms` whose target is `volume`.
    pub fn gain_at(&self, t_ms: f32, duration_ms: f32, volume: f32) -> f32 {
        if volume <= 0.0 || t_ms < 0.0 || t_ms > duration_ms {
            return 0.0;
        }

        let attack = self.attack_ms.min(duration_ms);
        if t_ms < attack {
            return volume * t_ms / attack;
        }

        let decay_span = duration_ms - attack;
        if decay_span <= 0.0 {
            return volume;
        }

        let floor = self.floor.min(volume);
        let progress = (t_ms - attack) / decay_span;
        volume * (floor / volume).powf(progress)
    }
}
