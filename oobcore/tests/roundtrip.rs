//! Multi-frame, multi-chunk round-trip coverage over the public API: a synthetic encoder
//! (randomize -> RS-encode -> continuous depth-8 interleave) feeds [`OobDecoder`], and the
//! recovered TS bytes are checked against what went in, including across arbitrary chunk
//! splits of the wire stream.

use oobcore::interleave::{BLOCK_LEN, WINDOW_LEN};
use oobcore::randomizer::RAND_TABLE;
use oobcore::rs::PAYLOAD_LEN;
use oobcore::{FRAME_LEN, OobDecoder, TS_LEN};
use reed_solomon::Encoder;

const DEPTH: usize = 8;

/// XOR one block's 94-byte payload against the randomizer table's slice for its position
/// within the 384-byte frame. The transmitter does this before RS-encoding, so the parity
/// computed afterwards matches the randomized payload rather than the clean one.
fn randomize_payload(payload: &[u8], block_in_frame: usize) -> Vec<u8> {
    let mask = &RAND_TABLE[BLOCK_LEN * block_in_frame..BLOCK_LEN * block_in_frame + PAYLOAD_LEN];
    payload.iter().zip(mask).map(|(&b, &m)| b ^ m).collect()
}

fn encode_block(randomized_payload: &[u8]) -> Vec<u8> {
    assert_eq!(randomized_payload.len(), PAYLOAD_LEN);
    let parity_len = BLOCK_LEN - PAYLOAD_LEN;
    let encoder = Encoder::new(parity_len);
    let mut padded = vec![0u8; 255 - parity_len];
    padded[255 - BLOCK_LEN..].copy_from_slice(randomized_payload);
    let encoded = encoder.encode(&padded);
    let mut block = vec![0u8; BLOCK_LEN];
    block[..PAYLOAD_LEN].copy_from_slice(randomized_payload);
    block[PAYLOAD_LEN..].copy_from_slice(&encoded[255 - parity_len..]);
    block
}

/// Continuously interleave a run of already-RS-encoded blocks, the inverse of repeatedly
/// calling `deinterleave` with a window advancing by one block at a time.
fn interleave(blocks: &[Vec<u8>]) -> Vec<u8> {
    let len = BLOCK_LEN * (blocks.len() + DEPTH - 1);
    let mut stream = vec![0u8; len];
    for (m, block) in blocks.iter().enumerate() {
        for (k, &byte) in block.iter().enumerate() {
            let lane = k % DEPTH;
            stream[BLOCK_LEN * m + k + BLOCK_LEN * lane] = byte;
        }
    }
    stream
}

fn sample_ts_packet(seed: u8, second_byte: u8) -> Vec<u8> {
    let mut ts = vec![0u8; TS_LEN];
    ts[0] = 0x47;
    ts[1] = second_byte;
    for (i, b) in ts.iter_mut().enumerate().skip(2) {
        *b = seed.wrapping_add(i as u8);
    }
    ts
}

/// Build `n_frames` valid encoded frames back to back as they would appear on the wire,
/// and return the wire stream alongside the clean TS bytes it should decode to.
fn build_stream(n_frames: usize) -> (Vec<u8>, Vec<u8>) {
    let mut clean = Vec::with_capacity(n_frames * 2 * TS_LEN);
    let mut blocks = Vec::with_capacity(n_frames * 4);

    for f in 0..n_frames {
        let ts0 = sample_ts_packet(f as u8, 0x10 + f as u8);
        let ts1 = sample_ts_packet(0x80 + f as u8, 0x21 + f as u8);

        for (half, ts) in [&ts0, &ts1].into_iter().enumerate() {
            for half_idx in 0..2 {
                let block_in_frame = half * 2 + half_idx;
                let payload = &ts[half_idx * PAYLOAD_LEN..(half_idx + 1) * PAYLOAD_LEN];
                let randomized = randomize_payload(payload, block_in_frame);
                blocks.push(encode_block(&randomized));
            }
        }

        clean.extend_from_slice(&ts0);
        clean.extend_from_slice(&ts1);
    }

    (interleave(&blocks), clean)
}

/// Decode an entire wire stream (plus interleaver lookahead tail) in one call.
fn decode_whole(wire: &[u8]) -> (Vec<u8>, OobDecoder) {
    let mut input = wire.to_vec();
    let in_len = input.len();
    let mut out = vec![0u8; in_len];
    let mut decoder = OobDecoder::new();
    let result = decoder
        .process_chunk(&mut input, in_len, &mut out, true)
        .unwrap();
    out.truncate(result.out_len);
    (out, decoder)
}

#[test]
fn clean_multi_frame_stream_round_trips_with_fec() {
    let n_frames = 6;
    let (wire, clean) = build_stream(n_frames);
    let (decoded, decoder) = decode_whole(&wire);

    assert_eq!(decoded, clean);
    assert_eq!(decoder.stats().blocks_total(), (4 * n_frames) as u64);
    assert_eq!(decoder.stats().blocks_error(), 0);
    assert_eq!(decoder.stats().blocks_corrected(), 0);
    for ts in decoded.chunks(TS_LEN) {
        assert_eq!(ts[0], 0x47);
        assert_eq!(ts[1] & 0x80, 0);
    }
}

#[test]
fn uncorrectable_block_sets_tei_without_disturbing_its_neighbor() {
    let (mut wire, _clean) = build_stream(1);
    // Corrupt 3 bytes of frame-local block 0's codeword in the interleaved domain: lane 0
    // (offset 0) is the sync anchor and must stay untouched, so use lanes 1..4 instead.
    for lane in 1..4 {
        wire[lane * BLOCK_LEN + lane] ^= 0xFF;
    }

    let mut input = wire.clone();
    let in_len = input.len();
    let mut out = vec![0u8; in_len];
    let mut decoder = OobDecoder::new();
    let result = decoder
        .process_chunk(&mut input, in_len, &mut out, true)
        .unwrap();

    assert_eq!(decoder.stats().blocks_error(), 1);
    assert_eq!(decoder.stats().blocks_corrected(), 0);
    assert_eq!(out[1] & 0x80, 0x80, "first TS packet must carry the TEI bit");
    assert_eq!(
        out[TS_LEN + 1] & 0x80,
        0,
        "second TS packet is a different RS block pair and must be unaffected"
    );
    let _ = result;
}

#[test]
fn chunk_split_is_invariant_over_whole_stream_decode() {
    let n_frames = 5;
    let (wire, clean) = build_stream(n_frames);

    let (whole, _) = decode_whole(&wire);
    assert_eq!(whole, clean);

    // Feed the same wire stream through in small, unevenly-sized chunks, carrying the
    // residual forward exactly as the CLI driver does, and check the concatenated output
    // matches the single-shot decode.
    let mut decoder = OobDecoder::new();
    let mut carry = vec![0u8; wire.len() + WINDOW_LEN];
    let mut carry_len = 0;
    let mut produced = Vec::new();
    // Generous: a call can drain several frames at once if enough lookahead has piled up.
    let mut out = vec![0u8; wire.len()];

    for piece in wire.chunks(97) {
        carry[carry_len..carry_len + piece.len()].copy_from_slice(piece);
        carry_len += piece.len();

        let result = decoder
            .process_chunk(&mut carry, carry_len, &mut out, true)
            .unwrap();
        produced.extend_from_slice(&out[..result.out_len]);
        carry_len = result.remaining;
    }

    assert_eq!(produced, clean);
    assert_eq!(decoder.stats().blocks_error(), 0);
}

#[test]
fn frame_len_matches_two_ts_packets() {
    assert_eq!(FRAME_LEN, 2 * TS_LEN + 2 * 2 * (BLOCK_LEN - PAYLOAD_LEN));
}
