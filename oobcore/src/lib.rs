//! Decoder for the CableLabs Out-Of-Band (OOB) downstream QPSK physical layer: turns a raw
//! demodulator byte stream into MPEG-2 TS packets by finding frame sync, undoing the
//! convolutional byte interleave, running Reed-Solomon(96,94) error correction, undoing the
//! transmitter's XOR randomizer, and stripping RS parity.
//!
//! [`OobDecoder`] is the session type: it owns the RS codec's tables and this run's FEC
//! counters, and [`OobDecoder::process_chunk`] is the only entry point a caller needs.

pub mod error;
pub mod interleave;
pub mod pipeline;
pub mod randomizer;
pub mod rs;
pub mod stats;
pub mod sync;

/// Bytes in one encoded frame: two MPEG-TS packets' worth of interleaved, RS-encoded,
/// randomized data (4 RS blocks of 96 bytes each).
pub const FRAME_LEN: usize = 384;

/// Bytes in one MPEG-2 TS packet, and thus in one decoded half-frame.
pub const TS_LEN: usize = 188;

/// RS parity symbols appended to each 94-byte payload to form a 96-byte block.
pub const PARITY_LEN: usize = 2;

pub use error::PipelineError;
pub use pipeline::{ChunkResult, OobDecoder};
pub use rs::BlockOutcome;
pub use stats::FecStats;
