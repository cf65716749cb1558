use thiserror::Error;

/// Contract violations on the pipeline's public entry point.
///
/// The underlying C implementation this decoder's framing logic is modeled on leaves
/// invalid-argument behavior undefined (an undersized output buffer is simply overrun).
/// This error type gives callers a checked alternative to that undefined behavior.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum PipelineError {
    /// `out_buf` is not large enough to hold the TS bytes this call could emit.
    #[error("output buffer capacity {capacity} is too small for input of {in_len} bytes")]
    OutputBufferTooSmall { capacity: usize, in_len: usize },
}
