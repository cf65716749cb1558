//! Inverse of the depth-8 byte convolutional interleaver applied at the transmitter.

/// Number of interleaved lanes (interleaver depth).
const DEPTH: usize = 8;
/// Columns per lane in one reassembled RS block.
const COLUMNS: usize = 12;
/// Size of one RS block in bytes.
pub const BLOCK_LEN: usize = 96;
/// Size of the sliding window needed to reassemble one RS block.
pub const WINDOW_LEN: usize = DEPTH * BLOCK_LEN;

/// Reassemble a single 96-byte RS block from a 768-byte interleaved window.
///
/// For lane `i` in `0..8` and column `n` in `0..12`, `out[8*n + i] = window[8*n + i + 96*i]`.
/// Lane 0 reads from the start of the window; lane 7 reads starting 96*7 = 672 bytes in.
pub fn deinterleave(window: &[u8; WINDOW_LEN]) -> [u8; BLOCK_LEN] {
    let mut out = [0u8; BLOCK_LEN];
    for lane in 0..DEPTH {
        for column in 0..COLUMNS {
            out[DEPTH * column + lane] = window[DEPTH * column + lane + BLOCK_LEN * lane];
        }
    }
    out
}

/// Interleave a run of 96-byte RS blocks into a flat stream, the inverse of repeated
/// calls to [`deinterleave`] with the window advancing by one block each time.
///
/// For block `m` and byte `k` (lane `i = k % 8`), the encoder places the byte at stream
/// position `96*m + k + 96*i` - the lane delay that [`deinterleave`]'s window walk undoes.
/// Only used by tests to exercise the round-trip property; the transmit side of the
/// interleaver is not otherwise part of this decoder.
#[cfg(test)]
fn interleave(blocks: &[[u8; BLOCK_LEN]]) -> Vec<u8> {
    let len = BLOCK_LEN * (blocks.len() + DEPTH - 1);
    let mut stream = vec![0u8; len];
    for (m, block) in blocks.iter().enumerate() {
        for (k, &byte) in block.iter().enumerate() {
            let lane = k % DEPTH;
            let pos = BLOCK_LEN * m + k + BLOCK_LEN * lane;
            stream[pos] = byte;
        }
    }
    stream
}
