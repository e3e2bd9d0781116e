//! Wire format of the MindWave Mobile 2 serial dialect.
//!
//! A frame is `[0xAA, 0xAA, plength, payload.., checksum]`. The payload is a
//! sequence of records: a code byte below 0x80 is followed by one value byte;
//! a code byte at or above 0x80 is followed by a length byte and that many
//! value bytes. The handshake markers stand alone, with no value at all.

/// Frame synchronization byte. Two in a row open a frame.
pub const SYNC: u8 = 0xAA;

/// Payloads must be shorter than this. A length byte of 170 or more means we
/// are misaligned: 0xAA itself can never be a valid length.
pub const PLENGTH_MAX: u8 = 170;

/// First handshake marker, sent while the link is coming up.
pub const CODE_STEP1: u8 = 0xBA;

/// Second handshake marker. The second marker of either kind completes the
/// handshake.
pub const CODE_STEP2: u8 = 0xBC;

/// Signal quality, one byte.
pub const CODE_SIGNAL: u8 = 0x02;

/// eSense attention, one byte, 0-100.
pub const CODE_ATTENTION: u8 = 0x04;

/// eSense meditation, one byte, 0-100.
pub const CODE_MEDITATION: u8 = 0x05;

/// Raw ADC sample, big-endian signed 16-bit.
pub const CODE_RAW: u8 = 0x80;

/// Eight-band power summary, eight 3-byte big-endian unsigned values.
pub const CODE_EEG: u8 = 0x83;

/// Required value length of a raw-sample record.
pub const RAW_VALUE_LEN: usize = 2;

/// Required value length of an EEG-power record.
pub const EEG_VALUE_LEN: usize = 24;

/// Payload checksum: bitwise inverse of the low byte of the byte sum.
pub fn checksum(payload: &[u8]) -> u8 {
    !payload.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}
