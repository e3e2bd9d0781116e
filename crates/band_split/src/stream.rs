//! Glue from the raw-sample callback to the splitter.

use tracing::debug;

use crate::convert::raw_to_microvolt;
use crate::split::{BandSplitter, BandWaveforms};
use crate::window::SampleWindow;

/// Streams raw samples into windows and hands each completed window's five
/// band waveforms to an observer.
///
/// Drive it from the reader's raw-sample callback: one `push_raw` per sample,
/// one observer call per [`WINDOW_LEN`](crate::window::WINDOW_LEN) samples.
pub struct BandStream {
    window: SampleWindow,
    splitter: BandSplitter,
    observer: Box<dyn FnMut(BandWaveforms) + Send>,
}

impl BandStream {
    pub fn new<F>(observer: F) -> Self
    where
        F: FnMut(BandWaveforms) + Send + 'static,
    {
        Self {
            window: SampleWindow::new(),
            splitter: BandSplitter::new(),
            observer: Box::new(observer),
        }
    }

    /// Feed one raw ADC sample.
    pub fn push_raw(&mut self, raw: i16) {
        self.window.push(raw_to_microvolt(raw));
        while let Some(window) = self.window.drain() {
            debug!("window full, splitting into bands");
            (self.observer)(self.splitter.split(&window));
        }
    }

    /// Samples buffered toward the next window.
    pub fn pending(&self) -> usize {
        self.window.len()
    }
}
