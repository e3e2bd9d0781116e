//! Raw ADC counts to microvolts.

/// ADC reference voltage in volts.
const V_REF: f32 = 1.8;

/// Counts across the converter's 12-bit range.
const ADC_STEPS: f32 = 4096.0;

/// Analog front-end amplification.
const GAIN: f32 = 2000.0;

/// Convert one raw sample to microvolts at the electrode.
///
/// `microvolts = raw * (V_REF / ADC_STEPS) / GAIN * 1e6`, rounded to three
/// decimal places. Linear and monotonic; zero maps to exactly 0.0.
pub fn raw_to_microvolt(raw: i16) -> f32 {
    let microvolts = raw as f32 * (V_REF / ADC_STEPS) / GAIN * 1e6;
    (microvolts * 1000.0).round() / 1000.0
}
