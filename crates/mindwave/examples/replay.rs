//! Decode a captured MindWave byte stream and print what it contains.
//!
//! Captures are raw session dumps, the same bytes the headset sends over its
//! RFCOMM link. Run with `cargo run --example replay -- capture.bin`.

use std::env;
use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Result};
use mindwave::{Field, IoSource, MindWave, Reading, ReaderEvent};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: replay <capture.bin>"),
    };
    let file = BufReader::new(File::open(&path)?);

    let (mut reader, events) = MindWave::new(IoSource::new(file));
    for field in [Field::Signal, Field::Attention, Field::Meditation] {
        reader.register(field, |reading| println!("{:?}", reading));
    }
    reader.register(Field::Eeg, |reading| {
        if let Reading::Eeg(powers) = reading {
            let pairs: Vec<String> = powers
                .iter()
                .map(|(band, value)| format!("{}={}", band.name(), value))
                .collect();
            println!("eeg {}", pairs.join(" "));
        }
    });

    reader.start()?;
    while let Ok(event) = events.recv_async().await {
        match event {
            ReaderEvent::Connected => println!("connected"),
            ReaderEvent::Stopped => break,
            ReaderEvent::Disconnected(err) => {
                println!("stream ended: {}", err);
                break;
            }
        }
    }
    let _ = reader.stop().await;
    println!("frames decoded: {}", reader.packets());
    Ok(())
}
