//! Adapter over a Reed-Solomon (96,94) codec on GF(256).
//!
//! Generator polynomial `(X - a)(X - a^2)`, field polynomial `X^8 + X^4 + X^3 + X^2 + 1`,
//! `T = 1`. The correction algorithm itself (Berlekamp-Massey, Chien search, Forney) is not
//! reimplemented here; this module only shortens the codec's native (255, 253) codeword down
//! to (96, 94) by zero-padding the unused leading symbols, per the `reed-solomon` crate's
//! systematic convention.

use log::debug;
use reed_solomon::Decoder;

/// Symbols in one RS codeword as transmitted on the wire.
pub const BLOCK_LEN: usize = 96;
/// Systematic payload symbols per block.
pub const PAYLOAD_LEN: usize = 94;
/// Parity symbols per block.
const PARITY_LEN: usize = BLOCK_LEN - PAYLOAD_LEN;
/// Native codeword length of the underlying GF(256) codec before shortening.
const FULL_LEN: usize = 255;
/// Leading zero symbols implied by shortening (255,253) down to (96,94).
const PAD_LEN: usize = FULL_LEN - BLOCK_LEN;

/// Outcome of decoding one 96-byte RS block, mirroring the reference decoder's three-way
/// return convention (clean / corrected / uncorrectable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Syndrome was already zero; block is unmodified.
    Clean,
    /// Syndrome was nonzero but correction succeeded; block was repaired in place.
    Corrected,
    /// Syndrome was nonzero and correction did not produce a valid codeword.
    Uncorrectable,
}

/// Thin, stateless wrapper around the underlying codec's tables.
///
/// Construction builds the codec's internal GF(256) tables once; the instance is then
/// immutable and may be reused across any number of `decode_block` calls. Not `Sync` by
/// virtue of the underlying crate, so a single `RsCodec` should be driven from one thread
/// at a time, per the core's single-threaded concurrency model.
pub struct RsCodec {
    decoder: Decoder,
}

impl RsCodec {
    /// Build the codec. Idempotent to call repeatedly; cheap enough to call once per
    /// decoding session rather than needing lazy global initialization.
    pub fn new() -> Self {
        Self {
            decoder: Decoder::new(PARITY_LEN),
        }
    }

    /// Attempt to decode `block` in place.
    ///
    /// A single call to the codec's error-counting correction both detects and repairs:
    /// zero errors reported means the block was already valid, a nonzero count means it was
    /// repaired, and an `Err` means correction failed (more errors than the code can fix).
    ///
    /// `erasures` threads through to the codec as symbol positions (1-based from the end of
    /// the 96-byte block) known in advance to be unreliable, e.g. from a QPSK layer flagging
    /// low-confidence symbols. Nothing in this decoder currently populates it - the core has
    /// no visibility into demodulator confidence - but the parameter is kept in the contract
    /// for that future caller rather than dropped for being presently unused.
    pub fn decode_block(
        &self,
        block: &mut [u8; BLOCK_LEN],
        erasures: Option<&[u8]>,
    ) -> BlockOutcome {
        let padded = pad(block);
        match self.decoder.correct_err_count(&padded, erasures) {
            Ok((_, 0)) => BlockOutcome::Clean,
            Ok((corrected, _)) => {
                block.copy_from_slice(&corrected[PAD_LEN..]);
                debug!("RS block corrected");
                BlockOutcome::Corrected
            }
            Err(_) => {
                debug!("RS block uncorrectable");
                BlockOutcome::Uncorrectable
            }
        }
    }
}

impl Default for RsCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn pad(block: &[u8; BLOCK_LEN]) -> [u8; FULL_LEN] {
    let mut padded = [0u8; FULL_LEN];
    padded[PAD_LEN..].copy_from_slice(block);
    padded
}
