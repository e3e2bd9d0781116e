//! Shared types for the MindWave reader stack
//!
//! This crate contains the vocabulary used by the protocol core and the band
//! transform: field tags, decoded readings, band-power snapshots, the
//! transport error type, and the diagnostic message sink.

pub mod data;
pub mod error;
pub mod sink;

// Re-export commonly used types
pub use data::*;
pub use error::*;
pub use sink::*;
