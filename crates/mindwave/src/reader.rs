//! Session lifecycle: the owner handle and the blocking read loop.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use log::{warn, Level};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use mindwave_types::{Field, LogSink, MessageSink, Reading, TransportError};

use crate::decoder::FrameDecoder;
use crate::interpreter::PayloadInterpreter;
use crate::state::{CallbackRegistry, DeviceState};
use crate::transport::ByteSource;

/// Session notifications pushed to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// The headset handshake completed.
    Connected,
    /// The read loop exited after a stop request.
    Stopped,
    /// The transport failed and the read loop has terminated.
    Disconnected(TransportError),
}

/// Lifecycle of the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReaderStatus {
    Idle = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

struct StatusCell(AtomicU8);

impl StatusCell {
    fn new() -> Self {
        Self(AtomicU8::new(ReaderStatus::Idle as u8))
    }

    fn store(&self, status: ReaderStatus) {
        self.0.store(status as u8, Ordering::SeqCst);
    }

    fn load(&self) -> ReaderStatus {
        match self.0.load(Ordering::SeqCst) {
            0 => ReaderStatus::Idle,
            1 => ReaderStatus::Running,
            2 => ReaderStatus::Stopping,
            _ => ReaderStatus::Stopped,
        }
    }
}

/// Lifecycle and usage errors of the owner surface.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("Reader is already running")]
    AlreadyRunning,
    #[error("Transport already consumed; build a new reader to reconnect")]
    SourceConsumed,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Reader task failed: {0}")]
    TaskFailed(String),
}

/// Owner handle for one headset session.
///
/// Construction hands back the handle and the session event channel. The
/// handle is one-shot: the read loop closes the transport when it exits, so
/// after a stop or a disconnection, reconnecting means building a new handle
/// over a fresh transport.
///
/// Values can be consumed two ways, matching how the headset is typically
/// used: poll [`current`](MindWave::current) for the slow eSense fields, or
/// [`register`](MindWave::register) a callback for the 512 Hz raw stream.
pub struct MindWave {
    state: Arc<DeviceState>,
    callbacks: Arc<Mutex<CallbackRegistry>>,
    status: Arc<StatusCell>,
    cancel: CancellationToken,
    events: flume::Sender<ReaderEvent>,
    source: Option<Box<dyn ByteSource>>,
    sink: Option<Box<dyn MessageSink>>,
    read_task: Option<JoinHandle<Result<(), TransportError>>>,
}

impl MindWave {
    /// Create a reader over `source`, reporting diagnostics through the
    /// `log` facade.
    pub fn new<S>(source: S) -> (Self, flume::Receiver<ReaderEvent>)
    where
        S: ByteSource + 'static,
    {
        Self::with_sink(source, LogSink)
    }

    /// Create a reader that reports diagnostics through `sink`.
    pub fn with_sink<S, K>(source: S, sink: K) -> (Self, flume::Receiver<ReaderEvent>)
    where
        S: ByteSource + 'static,
        K: MessageSink + 'static,
    {
        let (events, events_rx) = flume::unbounded();
        let reader = Self {
            state: Arc::new(DeviceState::new()),
            callbacks: Arc::new(Mutex::new(CallbackRegistry::default())),
            status: Arc::new(StatusCell::new()),
            cancel: CancellationToken::new(),
            events,
            source: Some(Box::new(source)),
            sink: Some(Box::new(sink)),
            read_task: None,
        };
        (reader, events_rx)
    }

    /// Spawn the blocking read loop. Must be called inside a Tokio runtime.
    pub fn start(&mut self) -> Result<(), ReaderError> {
        match self.status.load() {
            ReaderStatus::Running | ReaderStatus::Stopping => {
                return Err(ReaderError::AlreadyRunning);
            }
            ReaderStatus::Idle | ReaderStatus::Stopped => {}
        }
        let source = match self.source.take() {
            Some(source) => source,
            None => return Err(ReaderError::SourceConsumed),
        };
        let sink = self.sink.take().unwrap_or_else(|| Box::new(LogSink));

        self.cancel = CancellationToken::new();
        let decoder = FrameDecoder::new(source);
        let interpreter = PayloadInterpreter::new(
            self.state.clone(),
            self.callbacks.clone(),
            self.events.clone(),
        );
        let state = self.state.clone();
        let status = self.status.clone();
        let cancel = self.cancel.clone();
        let events = self.events.clone();

        status.store(ReaderStatus::Running);
        self.read_task = Some(tokio::task::spawn_blocking(move || {
            run_session(decoder, interpreter, sink, state, status, cancel, events)
        }));
        Ok(())
    }

    /// Request a cooperative stop and wait for the loop to exit.
    ///
    /// Idempotent. The loop observes the stop request between frame-read
    /// attempts, so the wait is bounded by the transport's read timeout. If
    /// the loop already died of a transport failure, that error is returned
    /// here.
    pub async fn stop(&mut self) -> Result<(), ReaderError> {
        let task = match self.read_task.take() {
            Some(task) => task,
            None => return Ok(()),
        };
        if self.status.load() == ReaderStatus::Running {
            self.status.store(ReaderStatus::Stopping);
        }
        self.cancel.cancel();
        let joined = task.await;
        self.status.store(ReaderStatus::Stopped);
        match joined {
            Ok(session_result) => {
                session_result?;
                Ok(())
            }
            Err(join_err) => Err(ReaderError::TaskFailed(join_err.to_string())),
        }
    }

    /// Install `callback` for `field`, replacing any previous one.
    ///
    /// Callbacks run on the reader context after the state write commits;
    /// keep them short. The raw-sample callback fires 512 times per second.
    pub fn register<F>(&self, field: Field, callback: F)
    where
        F: FnMut(&Reading) + Send + 'static,
    {
        self.callbacks.lock().unwrap().register(field, callback);
    }

    /// Remove the callback for `field`. A dispatch already in flight may
    /// deliver once more after this returns.
    pub fn unregister(&self, field: Field) -> bool {
        self.callbacks.lock().unwrap().unregister(field)
    }

    /// Latest decoded value of `field`.
    pub fn current(&self, field: Field) -> Reading {
        self.state.current(field)
    }

    /// Frames validated so far this session.
    pub fn packets(&self) -> u64 {
        self.state.packets()
    }

    pub fn status(&self) -> ReaderStatus {
        self.status.load()
    }

    /// Shared device state, for pollers that outlive this handle.
    pub fn state(&self) -> Arc<DeviceState> {
        self.state.clone()
    }
}

impl Drop for MindWave {
    fn drop(&mut self) {
        if self.read_task.is_some() {
            self.cancel.cancel();
            warn!("MindWave dropped while its reader was still running; call stop() first");
        }
    }
}

/// The blocking read loop. Runs until a stop request or a transport failure,
/// then closes the transport and reports how the session ended.
fn run_session(
    mut decoder: FrameDecoder<Box<dyn ByteSource>>,
    mut interpreter: PayloadInterpreter,
    mut sink: Box<dyn MessageSink>,
    state: Arc<DeviceState>,
    status: Arc<StatusCell>,
    cancel: CancellationToken,
    events: flume::Sender<ReaderEvent>,
) -> Result<(), TransportError> {
    let result = loop {
        if cancel.is_cancelled() {
            break Ok(());
        }
        match decoder.read_frame(&mut *sink) {
            Ok(Some(payload)) => {
                state.record_frame();
                interpreter.interpret(payload, &mut *sink);
            }
            Ok(None) => {}
            Err(err) => {
                let message = match &err {
                    TransportError::TimedOut => {
                        "Transport read timed out, check the headset is on".to_string()
                    }
                    other => format!("Transport failed: {}", other),
                };
                sink.emit(Level::Error, &message);
                break Err(err);
            }
        }
    };

    let mut source = decoder.into_source();
    if let Err(err) = source.close() {
        sink.emit(Level::Warn, &format!("Transport close failed: {}", err));
    }
    status.store(ReaderStatus::Stopped);
    match &result {
        Ok(()) => {
            let _ = events.send(ReaderEvent::Stopped);
        }
        Err(err) => {
            let _ = events.send(ReaderEvent::Disconnected(err.clone()));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{checksum, SYNC};
    use crate::transport::IoSource;
    use mindwave_types::MemorySink;
    use std::io::{self, Cursor};
    use std::time::Duration;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![SYNC, SYNC, payload.len() as u8];
        bytes.extend_from_slice(payload);
        bytes.push(checksum(payload));
        bytes
    }

    fn session_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(frame(&[0xBA]));
        bytes.extend(frame(&[0xBC]));
        bytes.extend(frame(&[0x02, 0x00, 0x04, 0x4B, 0x05, 0x37]));
        bytes.extend(frame(&[0x80, 0x02, 0x01, 0xF4]));
        bytes
    }

    #[tokio::test]
    async fn decodes_a_session_and_reports_the_disconnect() {
        let (mut reader, events) = MindWave::with_sink(
            IoSource::new(Cursor::new(session_bytes())),
            MemorySink::new(),
        );
        let (raw_tx, raw_rx) = flume::unbounded();
        reader.register(Field::Raw, move |reading| {
            let _ = raw_tx.send(*reading);
        });
        reader.start().unwrap();

        assert_eq!(events.recv_async().await.unwrap(), ReaderEvent::Connected);
        assert_eq!(
            events.recv_async().await.unwrap(),
            ReaderEvent::Disconnected(TransportError::Disconnected)
        );
        assert_eq!(raw_rx.recv_async().await.unwrap(), Reading::Raw(500));
        assert_eq!(reader.packets(), 4);
        assert_eq!(reader.current(Field::Attention), Reading::Attention(75));
        assert_eq!(reader.current(Field::Meditation), Reading::Meditation(55));
        assert_eq!(reader.status(), ReaderStatus::Stopped);

        match reader.stop().await {
            Err(ReaderError::Transport(TransportError::Disconnected)) => {}
            other => panic!("unexpected stop result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn stop_on_an_idle_stream_invokes_no_callbacks() {
        // An endless stream of zeros never syncs, so the loop spins between
        // attempts and must notice the stop request there.
        let (mut reader, events) =
            MindWave::with_sink(IoSource::new(io::repeat(0)), MemorySink::new());
        let (seen_tx, seen_rx) = flume::unbounded();
        reader.register(Field::Signal, move |reading| {
            let _ = seen_tx.send(*reading);
        });
        reader.start().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        reader.stop().await.unwrap();

        assert_eq!(events.recv_async().await.unwrap(), ReaderEvent::Stopped);
        assert!(seen_rx.try_recv().is_err());
        assert_eq!(reader.status(), ReaderStatus::Stopped);
        match reader.start() {
            Err(ReaderError::SourceConsumed) => {}
            other => panic!("unexpected restart result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let (mut reader, _events) = MindWave::new(IoSource::new(io::repeat(0)));
        reader.start().unwrap();
        match reader.start() {
            Err(ReaderError::AlreadyRunning) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        reader.stop().await.unwrap();
    }

    #[tokio::test]
    async fn timeout_is_fatal_and_reported() {
        struct SilentLink;
        impl io::Read for SilentLink {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::TimedOut, "no bytes"))
            }
        }
        let sink = MemorySink::new();
        let (mut reader, events) =
            MindWave::with_sink(IoSource::new(SilentLink), sink.clone());
        reader.start().unwrap();
        assert_eq!(
            events.recv_async().await.unwrap(),
            ReaderEvent::Disconnected(TransportError::TimedOut)
        );
        assert!(sink.contains("timed out"));
        match reader.stop().await {
            Err(ReaderError::Transport(TransportError::TimedOut)) => {}
            other => panic!("unexpected stop result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn stop_before_start_is_a_no_op() {
        let (mut reader, _events) = MindWave::new(IoSource::new(io::repeat(0)));
        reader.stop().await.unwrap();
        assert_eq!(reader.status(), ReaderStatus::Idle);
        reader.start().unwrap();
        reader.stop().await.unwrap();
    }
}
