use serde::{Deserialize, Serialize};

/// Samples per second on the raw-wave channel. Fixed by the headset firmware.
pub const SAMPLE_RATE: u32 = 512;

/// Signal-quality value reported while the electrodes are not in contact with
/// the skin. Zero means a clean signal; other nonzero values indicate partial
/// contact or interference.
pub const SIGNAL_NO_CONTACT: u8 = 200;

/// The eight power bands reported by the headset, in wire order.
///
/// An EEG-power record carries one 3-byte unsigned value per band, packed in
/// exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EegBand {
    Delta,
    Theta,
    AlphaLow,
    AlphaHigh,
    BetaLow,
    BetaHigh,
    GammaLow,
    GammaMid,
}

impl EegBand {
    /// All bands, ordered as their values appear in an EEG-power record.
    pub const ALL: [EegBand; 8] = [
        EegBand::Delta,
        EegBand::Theta,
        EegBand::AlphaLow,
        EegBand::AlphaHigh,
        EegBand::BetaLow,
        EegBand::BetaHigh,
        EegBand::GammaLow,
        EegBand::GammaMid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EegBand::Delta => "delta",
            EegBand::Theta => "theta",
            EegBand::AlphaLow => "alpha_low",
            EegBand::AlphaHigh => "alpha_high",
            EegBand::BetaLow => "beta_low",
            EegBand::BetaHigh => "beta_high",
            EegBand::GammaLow => "gamma_low",
            EegBand::GammaMid => "gamma_mid",
        }
    }
}

/// One snapshot of the eight band powers.
///
/// A single EEG-power record updates all eight values together; consumers
/// never observe a half-written snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandPowers {
    pub delta: u32,
    pub theta: u32,
    pub alpha_low: u32,
    pub alpha_high: u32,
    pub beta_low: u32,
    pub beta_high: u32,
    pub gamma_low: u32,
    pub gamma_mid: u32,
}

impl BandPowers {
    pub fn get(&self, band: EegBand) -> u32 {
        match band {
            EegBand::Delta => self.delta,
            EegBand::Theta => self.theta,
            EegBand::AlphaLow => self.alpha_low,
            EegBand::AlphaHigh => self.alpha_high,
            EegBand::BetaLow => self.beta_low,
            EegBand::BetaHigh => self.beta_high,
            EegBand::GammaLow => self.gamma_low,
            EegBand::GammaMid => self.gamma_mid,
        }
    }

    /// Band/value pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (EegBand, u32)> + '_ {
        EegBand::ALL.into_iter().map(move |band| (band, self.get(band)))
    }
}

/// Tag identifying one decoded value stream.
///
/// Used to register callbacks and to poll the device state. The set is closed:
/// unknown record codes are skipped at decode time and never surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Signal quality (0 = clean, [`SIGNAL_NO_CONTACT`] = no skin contact).
    Signal,
    /// eSense attention level, 0-100.
    Attention,
    /// eSense meditation level, 0-100.
    Meditation,
    /// Raw ADC sample, signed 16-bit.
    Raw,
    /// Eight-band power snapshot.
    Eeg,
}

impl Field {
    pub const COUNT: usize = 5;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Signal,
        Field::Attention,
        Field::Meditation,
        Field::Raw,
        Field::Eeg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Signal => "signal",
            Field::Attention => "attention",
            Field::Meditation => "meditation",
            Field::Raw => "raw",
            Field::Eeg => "eeg",
        }
    }

    /// Slot index in the callback dispatch table.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One decoded value, tagged by the field it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reading {
    Signal(u8),
    Attention(u8),
    Meditation(u8),
    Raw(i16),
    Eeg(BandPowers),
}

impl Reading {
    pub fn field(&self) -> Field {
        match self {
            Reading::Signal(_) => Field::Signal,
            Reading::Attention(_) => Field::Attention,
            Reading::Meditation(_) => Field::Meditation,
            Reading::Raw(_) => Field::Raw,
            Reading::Eeg(_) => Field::Eeg,
        }
    }
}
