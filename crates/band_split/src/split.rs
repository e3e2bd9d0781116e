//! The band transform itself.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use mindwave_types::SAMPLE_RATE;

use crate::bands::WaveBand;
use crate::window::WINDOW_LEN;

/// Five band-limited waveforms, each [`WINDOW_LEN`] samples, in
/// [`WaveBand::ALL`] order.
#[derive(Debug, Clone)]
pub struct BandWaveforms {
    pub delta: Vec<f32>,
    pub theta: Vec<f32>,
    pub alpha: Vec<f32>,
    pub beta: Vec<f32>,
    pub gamma: Vec<f32>,
}

impl BandWaveforms {
    pub fn get(&self, band: WaveBand) -> &[f32] {
        match band {
            WaveBand::Delta => &self.delta,
            WaveBand::Theta => &self.theta,
            WaveBand::Alpha => &self.alpha,
            WaveBand::Beta => &self.beta,
            WaveBand::Gamma => &self.gamma,
        }
    }

    /// Band/waveform pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (WaveBand, &[f32])> + '_ {
        WaveBand::ALL.into_iter().map(move |band| (band, self.get(band)))
    }
}

/// Splits one-second windows into the five wave bands.
///
/// One forward FFT per window; per band, every coefficient whose frequency
/// falls outside the band's half-open range is zeroed (mirror bins count as
/// their positive frequency) and the spectrum is transformed back. At 512
/// samples over one second each bin is exactly 1 Hz wide, so band edges land
/// on bin boundaries. The five bands are computed independently from the same
/// spectrum.
pub struct BandSplitter {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl BandSplitter {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(WINDOW_LEN),
            inverse: planner.plan_fft_inverse(WINDOW_LEN),
        }
    }

    /// Transform one window into its five band-limited waveforms.
    pub fn split(&self, window: &[f32; WINDOW_LEN]) -> BandWaveforms {
        let mut spectrum: Vec<Complex<f32>> = window
            .iter()
            .map(|&sample| Complex::new(sample, 0.0))
            .collect();
        self.forward.process(&mut spectrum);

        BandWaveforms {
            delta: self.band_pass(&spectrum, WaveBand::Delta),
            theta: self.band_pass(&spectrum, WaveBand::Theta),
            alpha: self.band_pass(&spectrum, WaveBand::Alpha),
            beta: self.band_pass(&spectrum, WaveBand::Beta),
            gamma: self.band_pass(&spectrum, WaveBand::Gamma),
        }
    }

    fn band_pass(&self, spectrum: &[Complex<f32>], band: WaveBand) -> Vec<f32> {
        let resolution = SAMPLE_RATE as f32 / WINDOW_LEN as f32;
        let mut masked = spectrum.to_vec();
        for (k, coeff) in masked.iter_mut().enumerate() {
            // Bins above N/2 are the mirrored negative frequencies; masking
            // them symmetrically keeps the inverse transform real.
            let bin = k.min(WINDOW_LEN - k);
            if !band.contains(bin as f32 * resolution) {
                *coeff = Complex::new(0.0, 0.0);
            }
        }
        self.inverse.process(&mut masked);
        let scale = 1.0 / WINDOW_LEN as f32;
        masked.iter().map(|coeff| coeff.re * scale).collect()
    }
}

impl Default for BandSplitter {
    fn default() -> Self {
        Self::new()
    }
}
