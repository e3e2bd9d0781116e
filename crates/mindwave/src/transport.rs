//! The byte-source seam between the decoder and the actual link.

use std::io::{self, Read};
use std::time::Duration;

use mindwave_types::TransportError;

/// Read timeout configured by the reference deployment's RFCOMM socket.
///
/// The reader does not enforce this itself; whoever opens the transport
/// configures it. A source with no timeout stalls `stop()` until the next
/// byte arrives.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// A blocking, ordered, lossless byte stream from the headset.
///
/// Implementations wrap an RFCOMM socket paired to the headset, a serial
/// device node, or a capture file for replay. All methods are called from the
/// reader's thread only.
pub trait ByteSource: Send {
    /// Fill `buf` completely or fail. Every error is fatal to the session.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError>;

    /// Release the underlying link. Called once after the read loop exits,
    /// never while a read is in flight.
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        (**self).read_exact(buf)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}

/// Adapts any blocking [`Read`] into a [`ByteSource`].
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read + Send> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Send> ByteSource for IoSource<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        self.inner.read_exact(buf).map_err(classify)
    }
}

fn classify(err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::TimedOut,
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TransportError::Disconnected,
        _ => TransportError::Io(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_exact_bytes_in_order() {
        let mut source = IoSource::new(Cursor::new(vec![1u8, 2, 3, 4]));
        let mut buf = [0u8; 2];
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn end_of_stream_maps_to_disconnected() {
        let mut source = IoSource::new(Cursor::new(vec![1u8]));
        let mut buf = [0u8; 2];
        assert_eq!(
            source.read_exact(&mut buf),
            Err(TransportError::Disconnected)
        );
    }

    #[test]
    fn timeout_kind_maps_to_timed_out() {
        struct Stalled;
        impl Read for Stalled {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
            }
        }
        let mut source = IoSource::new(Stalled);
        assert_eq!(
            source.read_exact(&mut [0u8; 1]),
            Err(TransportError::TimedOut)
        );
    }
}
