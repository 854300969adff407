use crate::alarm::output::{Tone, ToneOutput};
use crate::math::fft::dominant_frequency;
use crate::math::stats::StatsHelper;
use crate::prelude::AlertResult;
use crate::synthesis::buffer_pool::BufferPool;
use crate::telemetry::log::LogManager;
use serde::Serialize;
use std::collections::VecDeque;
use std::f32::consts::PI;

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Renders tones to mono f32 PCM.
pub struct ToneRenderer {
    sample_rate: u32,
    pool: BufferPool,
}

impl ToneRenderer {
    pub fn new(sample_rate: u32, pool_size: usize) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            pool: BufferPool::with_capacity(pool_size.max(1)),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn render(&mut self, tone: &Tone) -> AlertResult<Vec<f32>> {
        let sample_count = (tone.duration_ms * self.sample_rate as u64 / 1_000) as usize;
        let mut buffer = self.pool.checkout(sample_count)?;
        let rate = self.sample_rate as f32;
        for (index, sample) in buffer.iter_mut().enumerate() {
            let t_s = index as f32 / rate;
            let phase = 2.0 * PI * tone.frequency_hz * t_s;
            *sample = phase.sin() * tone.gain_at(t_s * 1_000.0);
        }
        Ok(buffer)
    }

    pub fn recycle(&mut self, buffer: Vec<f32>) {
        self.pool.release(buffer);
    }
}

/// Loudness and pitch measured from a render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderSummary {
    pub requested_hz: f32,
    pub measured_hz: f32,
    pub rms: f32,
    pub peak: f32,
    pub samples: usize,
}

impl RenderSummary {
    pub fn measure(tone: &Tone, samples: &[f32], sample_rate: u32) -> Self {
        Self {
            requested_hz: tone.frequency_hz,
            measured_hz: dominant_frequency(samples, sample_rate),
            rms: StatsHelper::rms(samples),
            peak: StatsHelper::peak(samples),
            samples: samples.len(),
        }
    }
}

pub struct RenderedTone {
    pub tone: Tone,
    pub samples: Vec<f32>,
}

/// Tone output that synthesizes PCM and keeps the most recent renders.
pub struct PcmOutput {
    renderer: ToneRenderer,
    captures: VecDeque<RenderedTone>,
    capture_limit: usize,
    logger: LogManager,
}

impl PcmOutput {
    pub fn new(sample_rate: u32, capture_limit: usize) -> Self {
        let capture_limit = capture_limit.max(1);
        Self {
            renderer: ToneRenderer::new(sample_rate, capture_limit),
            captures: VecDeque::with_capacity(capture_limit),
            capture_limit,
            logger: LogManager::new("pcm"),
        }
    }

    pub fn captures(&self) -> impl Iterator<Item = &RenderedTone> {
        self.captures.iter()
    }

    pub fn last_summary(&self) -> Option<RenderSummary> {
        self.captures.back().map(|capture| {
            RenderSummary::measure(&capture.tone, &capture.samples, self.renderer.sample_rate())
        })
    }
}

impl Default for PcmOutput {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, 8)
    }
}

impl ToneOutput for PcmOutput {
    fn emit(&mut self, tone: &Tone) {
        if self.captures.len() >= self.capture_limit {
            if let Some(oldest) = self.captures.pop_front() {
                self.renderer.recycle(oldest.samples);
            }
        }
        match self.renderer.render(tone) {
            Ok(samples) => {
                let summary = RenderSummary::measure(tone, &samples, self.renderer.sample_rate());
                self.logger.event("render", &summary);
                self.captures.push_back(RenderedTone {
                    tone: *tone,
                    samples,
                });
            }
            Err(err) => self.logger.degraded(&format!("dropping tone: {}", err)),
        }
    }

    fn silence(&mut self) {
        while let Some(capture) = self.captures.pop_front() {
            self.renderer.recycle(capture.samples);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::envelope::Envelope;

    fn tone(frequency_hz: f32, duration_ms: u64, volume: f32) -> Tone {
        Tone {
            frequency_hz,
            duration_ms,
            volume,
            envelope: Envelope::default(),
        }
    }

    #[test]
    fn render_matches_requested_pitch_and_volume() {
        let mut renderer = ToneRenderer::new(8_000, 2);
        let t = tone(1_000.0, 500, 0.7);
        let samples = renderer.render(&t).unwrap();
        assert_eq!(samples.len(), 4_000);
        assert_eq!(samples[0], 0.0);

        let summary = RenderSummary::measure(&t, &samples, 8_000);
        assert!((summary.measured_hz - 1_000.0).abs() <= 4.0);
        assert!(summary.peak <= 0.7 + 1e-4);
        assert!(summary.rms > 0.0);
    }

    #[test]
    fn render_of_silent_tone_is_flat() {
        let mut renderer = ToneRenderer::new(8_000, 1);
        let samples = renderer.render(&tone(440.0, 100, 0.0)).unwrap();
        assert_eq!(StatsHelper::peak(&samples), 0.0);
    }

    #[test]
    fn pcm_output_keeps_only_recent_captures() {
        let mut output = PcmOutput::new(8_000, 2);
        output.emit(&tone(800.0, 200, 0.5));
        output.emit(&tone(1_000.0, 200, 0.5));
        output.emit(&tone(1_200.0, 200, 0.5));

        let freqs: Vec<f32> = output.captures().map(|c| c.tone.frequency_hz).collect();
        assert_eq!(freqs, vec![1_000.0, 1_200.0]);
        assert_eq!(output.last_summary().map(|s| s.requested_hz), Some(1_200.0));

        output.silence();
        assert_eq!(output.captures().count(), 0);
        assert!(output.last_summary().is_none());
    }
}
