//! Sample buffering between the 512 Hz stream and the one-second transform.

use std::collections::VecDeque;

use mindwave_types::SAMPLE_RATE;

/// Samples per transform window: exactly one second of the raw stream.
pub const WINDOW_LEN: usize = SAMPLE_RATE as usize;

/// Queue of microvolt samples awaiting transformation.
///
/// Samples append at the tail; [`drain`](SampleWindow::drain) removes exactly
/// [`WINDOW_LEN`] from the head once that many have accumulated. Overflow
/// beyond a full window stays queued for the next one, so window boundaries
/// are decided purely by sample count.
#[derive(Debug, Default)]
pub struct SampleWindow {
    samples: VecDeque<f32>,
}

impl SampleWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_LEN),
        }
    }

    pub fn push(&mut self, microvolts: f32) {
        self.samples.push_back(microvolts);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= WINDOW_LEN
    }

    /// Remove and return one full window, or `None` until enough samples have
    /// accumulated.
    pub fn drain(&mut self) -> Option<[f32; WINDOW_LEN]> {
        if !self.is_full() {
            return None;
        }
        let mut window = [0.0; WINDOW_LEN];
        for (slot, sample) in window.iter_mut().zip(self.samples.drain(..WINDOW_LEN)) {
            *slot = sample;
        }
        Some(window)
    }
}
