//! Frame synchronization and validation.

use log::Level;

use mindwave_types::{MessageSink, TransportError};

use crate::protocol::{checksum, PLENGTH_MAX, SYNC};
use crate::transport::ByteSource;

/// Scans a byte source for validated frames.
///
/// One call to [`read_frame`](FrameDecoder::read_frame) is one
/// synchronization attempt: find two sync bytes, read the declared payload,
/// verify the checksum. A mismatched sync byte, an oversized length byte or a
/// bad checksum discards the attempt and scanning resumes wherever the stream
/// cursor ended up. There is no lookahead and no buffering beyond the payload
/// itself, so a corrupted frame costs at most one payload of bytes before the
/// decoder realigns.
pub struct FrameDecoder<S> {
    source: S,
    payload: Vec<u8>,
}

impl<S: ByteSource> FrameDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            payload: Vec::with_capacity(PLENGTH_MAX as usize),
        }
    }

    /// One synchronization attempt.
    ///
    /// `Ok(Some(payload))` is a validated payload, borrowed until the next
    /// call. `Ok(None)` means the attempt was discarded; call again to
    /// resynchronize. Transport errors are fatal to the session.
    pub fn read_frame(
        &mut self,
        sink: &mut dyn MessageSink,
    ) -> Result<Option<&[u8]>, TransportError> {
        if self.read_byte()? != SYNC {
            return Ok(None);
        }
        if self.read_byte()? != SYNC {
            return Ok(None);
        }
        let plength = self.read_byte()?;
        if plength >= PLENGTH_MAX {
            // Abandon here, before the payload: the length slot held another
            // sync byte or noise, and the real frame may start mid-"payload".
            sink.emit(Level::Warn, "Packet length too large, frame discarded");
            return Ok(None);
        }
        self.payload.clear();
        self.payload.resize(plength as usize, 0);
        self.source.read_exact(&mut self.payload)?;
        let declared = self.read_byte()?;
        if checksum(&self.payload) != declared {
            sink.emit(Level::Warn, "Checksum failed, frame discarded");
            return Ok(None);
        }
        Ok(Some(&self.payload))
    }

    /// Hand the transport back, e.g. to close it once the loop exits.
    pub fn into_source(self) -> S {
        self.source
    }

    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let mut byte = [0u8; 1];
        self.source.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
