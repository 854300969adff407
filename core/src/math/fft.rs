use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Wraps a planned forward FFT so repeated analyses of equal-length renders
/// share one plan.
pub struct FftHelper {
    fft: Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Zero-pads or truncates `input` to the planned size and transforms it.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex32> {
        let mut buffer: Vec<Complex32> = input
            .iter()
            .take(self.size)
            .map(|&value| Complex32::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex32::zero());
        self.fft.process(&mut buffer);
        buffer
    }

    /// Frequency of the strongest positive bin, in Hz.
    pub fn dominant_frequency(&self, samples: &[f32], sample_rate: u32) -> f32 {
        let spectrum = self.forward(samples);
        let half = self.size / 2;
        let peak_bin = spectrum
            .iter()
            .take(half + 1)
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.norm_sqr().total_cmp(&b.norm_sqr()))
            .map(|(bin, _)| bin)
            .unwrap_or(0);
        peak_bin as f32 * sample_rate as f32 / self.size as f32
    }
}

/// One-shot pitch estimate for a rendered buffer.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    if samples.is_empty() || sample_rate == 0 {
        return 0.0;
    }
    FftHelper::new(samples.len()).dominant_frequency(samples, sample_rate)
}
