//! Reader for the NeuroSky MindWave Mobile 2 byte stream
//!
//! The headset speaks a ThinkGear-style serial dialect over its RFCOMM link:
//! sync-framed packets carrying signal quality, eSense attention/meditation
//! levels, raw ADC samples and eight-band power summaries. This crate decodes
//! that stream from any blocking byte source, maintains the latest value of
//! every field, and fires per-field callbacks for push-style consumers.
//!
//! [`MindWave`] owns the blocking read loop; [`FrameDecoder`] and
//! [`PayloadInterpreter`] are usable on their own for replay tools and tests.

pub mod decoder;
pub mod interpreter;
pub mod protocol;
pub mod reader;
pub mod state;
pub mod transport;

// Re-export commonly used types
pub use decoder::FrameDecoder;
pub use interpreter::PayloadInterpreter;
pub use mindwave_types::{
    BandPowers, EegBand, Field, LogSink, MemorySink, MessageSink, Reading, TransportError,
    SAMPLE_RATE, SIGNAL_NO_CONTACT,
};
pub use reader::{MindWave, ReaderError, ReaderEvent, ReaderStatus};
pub use state::{Callback, CallbackRegistry, DeviceState};
pub use transport::{ByteSource, IoSource, READ_TIMEOUT};
