//! Record walk over validated payloads.

use std::sync::{Arc, Mutex};

use log::Level;

use mindwave_types::{BandPowers, MessageSink, Reading, SIGNAL_NO_CONTACT};

use crate::protocol::{
    CODE_ATTENTION, CODE_EEG, CODE_MEDITATION, CODE_RAW, CODE_SIGNAL, CODE_STEP1, CODE_STEP2,
    EEG_VALUE_LEN, RAW_VALUE_LEN,
};
use crate::reader::ReaderEvent;
use crate::state::{CallbackRegistry, DeviceState};

/// Walks the records of validated payloads, updating device state and firing
/// callbacks.
///
/// Codes below 0x80 are short fields (one value byte); codes at or above 0x80
/// are long fields (a length byte, then that many value bytes); the handshake
/// markers stand alone. The walk runs on the reader's context, and every
/// state write commits before its callback fires.
pub struct PayloadInterpreter {
    state: Arc<DeviceState>,
    callbacks: Arc<Mutex<CallbackRegistry>>,
    events: flume::Sender<ReaderEvent>,
    handshake_steps: u32,
}

impl PayloadInterpreter {
    pub fn new(
        state: Arc<DeviceState>,
        callbacks: Arc<Mutex<CallbackRegistry>>,
        events: flume::Sender<ReaderEvent>,
    ) -> Self {
        Self {
            state,
            callbacks,
            events,
            handshake_steps: 0,
        }
    }

    /// Interpret every record of one validated payload.
    pub fn interpret(&mut self, payload: &[u8], sink: &mut dyn MessageSink) {
        let mut idx = 0;
        while idx < payload.len() {
            let code = payload[idx];
            sink.emit(
                Level::Debug,
                &format!("Reading record code 0x{:02X}", code),
            );

            if code == CODE_STEP1 || code == CODE_STEP2 {
                self.handshake_step(sink);
                // The rest of a handshake payload is padding, not records.
                return;
            }

            if code < 0x80 {
                let value = match payload.get(idx + 1) {
                    Some(&value) => value,
                    None => {
                        sink.emit(Level::Warn, "Truncated record, payload discarded");
                        return;
                    }
                };
                self.short_field(code, value, sink);
                idx += 2;
            } else {
                let vlen = match payload.get(idx + 1) {
                    Some(&vlen) => vlen as usize,
                    None => {
                        sink.emit(Level::Warn, "Truncated record, payload discarded");
                        return;
                    }
                };
                let value = match payload.get(idx + 2..idx + 2 + vlen) {
                    Some(value) => value,
                    None => {
                        sink.emit(Level::Warn, "Truncated record, payload discarded");
                        return;
                    }
                };
                self.long_field(code, value, sink);
                idx += 2 + vlen;
            }
        }
    }

    fn handshake_step(&mut self, sink: &mut dyn MessageSink) {
        self.handshake_steps = self.handshake_steps.saturating_add(1);
        if self.handshake_steps == 2 {
            sink.emit(Level::Info, "MindWave connection established");
            let _ = self.events.send(ReaderEvent::Connected);
        }
    }

    fn short_field(&mut self, code: u8, value: u8, sink: &mut dyn MessageSink) {
        match code {
            CODE_SIGNAL => {
                self.state.set_signal(value);
                self.dispatch(Reading::Signal(value));
                if value == SIGNAL_NO_CONTACT {
                    sink.emit(Level::Warn, "Electrodes are not in contact with the skin");
                } else if value != 0 {
                    sink.emit(Level::Warn, &format!("Poor signal quality: {}", value));
                }
            }
            CODE_ATTENTION => {
                self.state.set_attention(value);
                self.dispatch(Reading::Attention(value));
            }
            CODE_MEDITATION => {
                self.state.set_meditation(value);
                self.dispatch(Reading::Meditation(value));
            }
            _ => sink.emit(
                Level::Warn,
                &format!("Unrecognized code 0x{:02X}, record skipped", code),
            ),
        }
    }

    fn long_field(&mut self, code: u8, value: &[u8], sink: &mut dyn MessageSink) {
        match code {
            CODE_RAW => {
                if value.len() != RAW_VALUE_LEN {
                    sink.emit(
                        Level::Warn,
                        &format!(
                            "Raw record with {} value bytes (expected {}), record skipped",
                            value.len(),
                            RAW_VALUE_LEN
                        ),
                    );
                    return;
                }
                let raw = i16::from_be_bytes([value[0], value[1]]);
                self.state.set_raw(raw);
                self.dispatch(Reading::Raw(raw));
            }
            CODE_EEG => {
                if value.len() != EEG_VALUE_LEN {
                    sink.emit(
                        Level::Warn,
                        &format!(
                            "EEG record with {} value bytes (expected {}), record skipped",
                            value.len(),
                            EEG_VALUE_LEN
                        ),
                    );
                    return;
                }
                let powers = decode_band_powers(value);
                self.state.set_eeg(powers);
                self.dispatch(Reading::Eeg(powers));
            }
            _ => sink.emit(
                Level::Warn,
                &format!("Unrecognized code 0x{:02X}, record skipped", code),
            ),
        }
    }

    fn dispatch(&self, reading: Reading) {
        self.callbacks.lock().unwrap().dispatch(&reading);
    }
}

/// Unpack eight 3-byte big-endian unsigned values, in wire order.
fn decode_band_powers(value: &[u8]) -> BandPowers {
    let mut bands = [0u32; 8];
    for (i, chunk) in value.chunks_exact(3).enumerate() {
        bands[i] = u32::from_be_bytes([0, chunk[0], chunk[1], chunk[2]]);
    }
    BandPowers {
        delta: bands[0],
        theta: bands[1],
        alpha_low: bands[2],
        alpha_high: bands[3],
        beta_low: bands[4],
        beta_high: bands[5],
        gamma_low: bands[6],
        gamma_mid: bands[7],
    }
}
