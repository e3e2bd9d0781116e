//! End-to-end session over a synthetic capture, public API only.

use std::io::Cursor;

use mindwave::protocol::{checksum, SYNC};
use mindwave::{Field, IoSource, MemorySink, MindWave, Reading, ReaderEvent, TransportError};

fn frame(payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![SYNC, SYNC, payload.len() as u8];
    bytes.extend_from_slice(payload);
    bytes.push(checksum(payload));
    bytes
}

#[tokio::test]
async fn decodes_a_noisy_capture_end_to_end() {
    // Handshake, then records interleaved with line noise and one corrupted
    // frame, the way a real RFCOMM capture looks.
    let mut capture = Vec::new();
    capture.extend(frame(&[0xBA]));
    capture.extend(frame(&[0xBC]));
    capture.extend([0x00, 0xAA, 0x17]);
    capture.extend(frame(&[0x02, 0xC8]));
    let mut corrupted = frame(&[0x04, 0x63]);
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xFF;
    capture.extend(corrupted);
    capture.extend(frame(&[0x04, 0x63, 0x05, 0x2A]));
    let mut eeg = vec![0x83, 24];
    for i in 1u8..=8 {
        eeg.extend([0, 0, i]);
    }
    capture.extend(frame(&eeg));

    let sink = MemorySink::new();
    let (mut reader, events) =
        MindWave::with_sink(IoSource::new(Cursor::new(capture)), sink.clone());

    let (eeg_tx, eeg_rx) = flume::unbounded();
    reader.register(Field::Eeg, move |reading| {
        let _ = eeg_tx.send(*reading);
    });

    reader.start().unwrap();
    assert_eq!(events.recv_async().await.unwrap(), ReaderEvent::Connected);
    assert_eq!(
        events.recv_async().await.unwrap(),
        ReaderEvent::Disconnected(TransportError::Disconnected)
    );

    match eeg_rx.recv_async().await.unwrap() {
        Reading::Eeg(powers) => {
            assert_eq!(powers.delta, 1);
            assert_eq!(powers.gamma_mid, 8);
        }
        other => panic!("unexpected reading: {:?}", other),
    }

    // The corrupted frame does not count; the noise bytes cost nothing.
    assert_eq!(reader.packets(), 5);
    assert_eq!(reader.current(Field::Attention), Reading::Attention(0x63));
    assert_eq!(reader.current(Field::Meditation), Reading::Meditation(0x2A));
    assert_eq!(reader.current(Field::Signal), Reading::Signal(200));
    assert!(sink.contains("not in contact"));
    assert!(sink.contains("Checksum failed"));

    assert!(reader.stop().await.is_err());
}

#[tokio::test]
async fn unregistered_fields_stay_pollable() {
    let mut capture = Vec::new();
    capture.extend(frame(&[0x04, 0x50]));
    capture.extend(frame(&[0x05, 0x28]));

    let (mut reader, events) =
        MindWave::with_sink(IoSource::new(Cursor::new(capture)), MemorySink::new());
    reader.start().unwrap();
    while !matches!(
        events.recv_async().await.unwrap(),
        ReaderEvent::Disconnected(_)
    ) {}

    assert_eq!(reader.current(Field::Attention), Reading::Attention(0x50));
    assert_eq!(reader.current(Field::Meditation), Reading::Meditation(0x28));
    assert_eq!(reader.current(Field::Signal), Reading::Signal(0));
    let _ = reader.stop().await;
}
