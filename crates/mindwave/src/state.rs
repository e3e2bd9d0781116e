//! Last-known device values and the callback dispatch table.

use std::sync::atomic::{AtomicI16, AtomicU64, AtomicU8, Ordering};
use std::sync::RwLock;

use mindwave_types::{BandPowers, Field, Reading};

/// Latest value of every decoded field, plus the validated-frame counter.
///
/// The reader context is the only writer; any context may read. Each scalar
/// field is individually atomic, and the eight band powers swap as one value,
/// so readers never observe a torn snapshot. Fields read as zero until the
/// first record of their kind decodes.
#[derive(Debug, Default)]
pub struct DeviceState {
    packets: AtomicU64,
    signal: AtomicU8,
    attention: AtomicU8,
    meditation: AtomicU8,
    raw: AtomicI16,
    eeg: RwLock<BandPowers>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of frames that passed checksum validation this session.
    pub fn packets(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    pub fn signal(&self) -> u8 {
        self.signal.load(Ordering::Relaxed)
    }

    pub fn attention(&self) -> u8 {
        self.attention.load(Ordering::Relaxed)
    }

    pub fn meditation(&self) -> u8 {
        self.meditation.load(Ordering::Relaxed)
    }

    pub fn raw(&self) -> i16 {
        self.raw.load(Ordering::Relaxed)
    }

    pub fn eeg(&self) -> BandPowers {
        *self.eeg.read().unwrap()
    }

    /// Snapshot of one field as a tagged reading.
    pub fn current(&self, field: Field) -> Reading {
        match field {
            Field::Signal => Reading::Signal(self.signal()),
            Field::Attention => Reading::Attention(self.attention()),
            Field::Meditation => Reading::Meditation(self.meditation()),
            Field::Raw => Reading::Raw(self.raw()),
            Field::Eeg => Reading::Eeg(self.eeg()),
        }
    }

    pub(crate) fn record_frame(&self) {
        self.packets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_signal(&self, value: u8) {
        self.signal.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_attention(&self, value: u8) {
        self.attention.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_meditation(&self, value: u8) {
        self.meditation.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_raw(&self, value: i16) {
        self.raw.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_eeg(&self, powers: BandPowers) {
        *self.eeg.write().unwrap() = powers;
    }
}

/// Observer invoked on the reader context after a field updates.
pub type Callback = Box<dyn FnMut(&Reading) + Send>;

/// At most one callback per field, dispatched by field tag.
///
/// Registration may happen from any thread at any time; dispatch runs on the
/// reader context while holding the table lock, so a callback must not
/// register or remove callbacks from inside itself.
#[derive(Default)]
pub struct CallbackRegistry {
    slots: [Option<Callback>; Field::COUNT],
}

impl CallbackRegistry {
    /// Install `callback` for `field`, replacing any previous one.
    pub fn register<F>(&mut self, field: Field, callback: F)
    where
        F: FnMut(&Reading) + Send + 'static,
    {
        self.slots[field.index()] = Some(Box::new(callback));
    }

    /// Remove the callback for `field`. Returns true if one was installed.
    pub fn unregister(&mut self, field: Field) -> bool {
        self.slots[field.index()].take().is_some()
    }

    /// Invoke the callback registered for this reading's field, if any.
    pub fn dispatch(&mut self, reading: &Reading) {
        if let Some(callback) = &mut self.slots[reading.field().index()] {
            callback(reading);
        }
    }
}
