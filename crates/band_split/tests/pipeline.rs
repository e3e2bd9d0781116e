//! Full data path: byte stream in, band waveforms out.

use std::io::Cursor;

use band_split::{BandStream, WaveBand, WINDOW_LEN};
use mindwave::protocol::{checksum, SYNC};
use mindwave::{Field, IoSource, MemorySink, MindWave, Reading, ReaderEvent};

fn raw_frame(sample: i16) -> Vec<u8> {
    let value = sample.to_be_bytes();
    let payload = [0x80, 0x02, value[0], value[1]];
    let mut bytes = vec![SYNC, SYNC, payload.len() as u8];
    bytes.extend_from_slice(&payload);
    bytes.push(checksum(&payload));
    bytes
}

#[tokio::test]
async fn byte_stream_becomes_band_waveforms() {
    // One second of a 10 Hz tone as raw-sample frames.
    let mut capture = Vec::new();
    for i in 0..WINDOW_LEN {
        let phase = std::f32::consts::TAU * 10.0 * i as f32 / WINDOW_LEN as f32;
        capture.extend(raw_frame((phase.sin() * 1000.0) as i16));
    }

    let (wave_tx, wave_rx) = flume::unbounded();
    let mut stream = BandStream::new(move |waveforms| {
        let _ = wave_tx.send(waveforms);
    });

    let (mut reader, events) =
        MindWave::with_sink(IoSource::new(Cursor::new(capture)), MemorySink::new());
    reader.register(Field::Raw, move |reading| {
        if let Reading::Raw(sample) = reading {
            stream.push_raw(*sample);
        }
    });

    reader.start().unwrap();
    while !matches!(
        events.recv_async().await.unwrap(),
        ReaderEvent::Disconnected(_)
    ) {}
    let _ = reader.stop().await;

    let waveforms = wave_rx.recv_async().await.unwrap();
    assert!(wave_rx.try_recv().is_err());
    for band in WaveBand::ALL {
        assert_eq!(waveforms.get(band).len(), WINDOW_LEN);
    }

    // The tone is alpha; its band carries essentially all the energy.
    let energy = |band: WaveBand| -> f32 {
        waveforms.get(band).iter().map(|s| s * s).sum()
    };
    let alpha = energy(WaveBand::Alpha);
    for band in [WaveBand::Delta, WaveBand::Theta, WaveBand::Beta, WaveBand::Gamma] {
        assert!(alpha > 100.0 * energy(band).max(1e-6), "{}", band.name());
    }
    assert_eq!(reader.packets(), WINDOW_LEN as u64);
}
