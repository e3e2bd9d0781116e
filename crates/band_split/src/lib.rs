//! Band-limited views of the raw MindWave signal
//!
//! The headset streams one raw ADC sample per tick at a fixed 512 Hz. This
//! crate converts those samples to microvolts, buffers them into one-second
//! windows, and splits each window into the five classical wave bands (delta
//! through gamma) by zeroing FFT coefficients outside each band and
//! transforming back. The outputs are time-domain waveforms the same length
//! as the window, one per band.

pub mod bands;
pub mod convert;
pub mod split;
pub mod stream;
pub mod window;

// Re-export commonly used types
pub use bands::WaveBand;
pub use convert::raw_to_microvolt;
pub use split::{BandSplitter, BandWaveforms};
pub use stream::BandStream;
pub use window::{SampleWindow, WINDOW_LEN};
