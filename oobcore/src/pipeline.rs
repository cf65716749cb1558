//! Orchestrates sync -> de-interleave -> RS -> de-randomize -> strip-parity over a
//! caller-supplied chunk of input.

use log::{debug, warn};

use crate::error::PipelineError;
use crate::interleave::{deinterleave, BLOCK_LEN, WINDOW_LEN};
use crate::randomizer::derandomize;
use crate::rs::{BlockOutcome, RsCodec};
use crate::stats::FecStats;
use crate::sync::find_sync;
use crate::{FRAME_LEN, PARITY_LEN, TS_LEN};

/// Outcome of one [`OobDecoder::process_chunk`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkResult {
    /// Number of TS bytes written to the caller's output buffer.
    pub out_len: usize,
    /// Trailing bytes of `in_buf` that were shifted to its front and must be re-presented
    /// as the prefix of the next chunk.
    pub remaining: usize,
}

/// A decoding session: the RS codec's tables plus this session's FEC statistics.
///
/// The C implementation this is modeled on keeps its RS tables and counters in process
/// globals, lazily initialized on first use. Here they are owned fields instead, so
/// multiple independent sessions may coexist (though each must still be driven from a
/// single thread, since the underlying RS codec is not re-entrant).
pub struct OobDecoder {
    codec: RsCodec,
    stats: FecStats,
}

impl OobDecoder {
    /// Build a new session. Builds the RS codec's GF(256) tables immediately.
    pub fn new() -> Self {
        Self {
            codec: RsCodec::new(),
            stats: FecStats::default(),
        }
    }

    /// This session's FEC counters, monotonically non-decreasing for its lifetime.
    pub fn stats(&self) -> &FecStats {
        &self.stats
    }

    /// Process `in_buf[..in_len]`, writing recovered TS bytes to `out_buf` and returning
    /// how many were written along with the unconsumed residual length.
    ///
    /// `in_buf` is mutated: frame-sized windows are overwritten in place with their
    /// de-interleaved and de-randomized contents as working storage. Any unconsumed tail
    /// is shifted to `in_buf[0..remaining)` before return - the caller must re-present those
    /// bytes as the prefix of the next chunk, followed by newly-read data.
    ///
    /// When `do_fec` is `false`, RS blocks are not checked at all: uncorrectable (or even
    /// byte-corrupted) frames are passed through silently and the TEI bit is never set.
    pub fn process_chunk(
        &mut self,
        in_buf: &mut [u8],
        in_len: usize,
        out_buf: &mut [u8],
        do_fec: bool,
    ) -> Result<ChunkResult, PipelineError> {
        let max_frames = in_len / FRAME_LEN;
        let max_out = max_frames * 2 * TS_LEN;
        if out_buf.len() < max_out {
            return Err(PipelineError::OutputBufferTooSmall {
                capacity: out_buf.len(),
                in_len,
            });
        }

        let mut i = 0;
        let mut out_len = 0;

        while i + (FRAME_LEN - 1) < in_len {
            i += find_sync(in_buf, i, in_len);
            // The last of the 4 windows (block 3) starts 3 blocks into the frame and itself
            // needs a full WINDOW_LEN of lookahead to de-interleave.
            if i + BLOCK_LEN * 3 + WINDOW_LEN > in_len {
                warn!("insufficient lookahead to de-interleave a frame at offset {i}, deferring");
                break;
            }
            debug!("synchronized frame at offset {i}");

            for n in 0..4 {
                let window_start = i + BLOCK_LEN * n;
                let window: [u8; WINDOW_LEN] = in_buf[window_start..window_start + WINDOW_LEN]
                    .try_into()
                    .expect("slice matches WINDOW_LEN");
                let block = deinterleave(&window);
                in_buf[window_start..window_start + BLOCK_LEN].copy_from_slice(&block);
            }

            let mut outcomes = [BlockOutcome::Clean; 4];
            if do_fec {
                for (n, outcome) in outcomes.iter_mut().enumerate() {
                    let block_start = i + BLOCK_LEN * n;
                    let mut block: [u8; BLOCK_LEN] = in_buf[block_start..block_start + BLOCK_LEN]
                        .try_into()
                        .expect("slice matches BLOCK_LEN");
                    self.stats.record_total();
                    *outcome = self.codec.decode_block(&mut block, None);
                    match outcome {
                        BlockOutcome::Clean => {}
                        BlockOutcome::Corrected => {
                            self.stats.record_error();
                            self.stats.record_corrected();
                        }
                        BlockOutcome::Uncorrectable => {
                            self.stats.record_error();
                            warn!("uncorrectable RS block at frame offset {i}, block {n}");
                        }
                    }
                    in_buf[block_start..block_start + BLOCK_LEN].copy_from_slice(&block);
                }
            }

            derandomize(&mut in_buf[i..i + FRAME_LEN], 0);

            if do_fec {
                const HALF_FRAME: usize = FRAME_LEN / 2;
                for (p, pair) in outcomes.chunks(2).enumerate() {
                    if pair.contains(&BlockOutcome::Uncorrectable) {
                        in_buf[i + HALF_FRAME * p + 1] |= 0x80;
                    }
                }
            }

            for n in 0..4 {
                let block_start = i + BLOCK_LEN * n;
                let payload = BLOCK_LEN - PARITY_LEN;
                out_buf[out_len..out_len + payload]
                    .copy_from_slice(&in_buf[block_start..block_start + payload]);
                out_len += payload;
            }

            i += FRAME_LEN;
        }

        if in_len > i {
            in_buf.copy_within(i..in_len, 0);
            Ok(ChunkResult {
                out_len,
                remaining: in_len - i,
            })
        } else {
            Ok(ChunkResult {
                out_len,
                remaining: 0,
            })
        }
    }
}

impl Default for OobDecoder {
    fn default() -> Self {
        Self::new()
    }
}
