use thiserror::Error;

/// Failures raised by the portable codec. Decode problems are fatal to that
/// decode and surfaced to the caller unchanged; this layer never retries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The byte stream violates the frame schema: wrong version, foreign
    /// class discriminator, unexpected field name or tag, or truncation.
    #[error("malformed wire data: {0}")]
    MalformedWireData(String),

    /// An encode-side payload exceeds the representable limit.
    #[error("payload too large: {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: usize, max: usize },
}
