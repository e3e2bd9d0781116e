/// The five classical wave bands, with half-open frequency ranges in Hz.
///
/// Boundaries are low-inclusive, high-exclusive: a 13 Hz component belongs to
/// beta, not alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveBand {
    /// 1-4 Hz.
    Delta,
    /// 4-8 Hz.
    Theta,
    /// 8-13 Hz.
    Alpha,
    /// 13-31 Hz.
    Beta,
    /// 31-51 Hz.
    Gamma,
}

impl WaveBand {
    /// All bands, in output order.
    pub const ALL: [WaveBand; 5] = [
        WaveBand::Delta,
        WaveBand::Theta,
        WaveBand::Alpha,
        WaveBand::Beta,
        WaveBand::Gamma,
    ];

    /// `[low, high)` band edges in Hz.
    pub fn range(self) -> (f32, f32) {
        match self {
            WaveBand::Delta => (1.0, 4.0),
            WaveBand::Theta => (4.0, 8.0),
            WaveBand::Alpha => (8.0, 13.0),
            WaveBand::Beta => (13.0, 31.0),
            WaveBand::Gamma => (31.0, 51.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WaveBand::Delta => "delta",
            WaveBand::Theta => "theta",
            WaveBand::Alpha => "alpha",
            WaveBand::Beta => "beta",
            WaveBand::Gamma => "gamma",
        }
    }

    /// True if `freq` (Hz) falls inside this band.
    pub fn contains(self, freq: f32) -> bool {
        let (low, high) = self.range();
        low <= freq && freq < high
    }
}
