use crate::alarm::envelope::Envelope;
use serde::Serialize;

/// A tone ready for an output device: pitch, length, and envelope target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub volume: f32,
    pub envelope: Envelope,
}

impl Tone {
    pub fn gain_at(&self, t_ms: f32) -> f32 {
        self.envelope
            .gain_at(t_ms, self.duration_ms as f32, self.volume)
    }
}

/// Audio capability the alarm controller plays through.
///
/// Implementations must not panic or block; a device that cannot play should
/// report `is_available() == false` and the controller stays silent.
pub trait ToneOutput: Send {
    fn is_available(&self) -> bool {
        true
    }

    fn emit(&mut self, tone: &Tone);

    /// Cuts off anything currently sounding.
    fn silence(&mut self);
}

/// Output used when no audio device exists.
#[derive(Debug, Default)]
pub struct NullOutput;

impl ToneOutput for NullOutput {
    fn is_available(&self) -> bool {
        false
    }

    fn emit(&mut self, _tone: &Tone) {}

    fn silence(&mut self) {}
}
