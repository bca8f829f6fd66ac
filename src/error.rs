//! Error type shared by every parser and serializer in this crate.

/// Everything that can go wrong while decoding or encoding a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A decoder needed more bytes than the buffer had left.
    #[error("truncated: need {needed} byte(s), have {available}")]
    Truncated {
        /// Bytes the decoder needed to make progress.
        needed: usize,
        /// Bytes actually remaining in the buffer.
        available: usize,
    },
    /// The first byte of a frame does not match any known variant.
    #[error("unknown frame type 0x{0:02x}")]
    Unknown(u8),
    /// A varint claimed a width the buffer could not supply, or a value to be
    /// written does not fit in 62 bits.
    #[error("varint overflow")]
    VarintOverflow,
    /// The caller-supplied output buffer is smaller than `size()`.
    #[error("output buffer too small: need {needed}, have {available}")]
    OversizeOutput {
        /// Bytes the serializer needed to write.
        needed: usize,
        /// Bytes actually available in the caller's buffer.
        available: usize,
    },
}

impl Error {
    pub(crate) fn truncated(needed: usize, available: usize) -> Self {
        Error::Truncated { needed, available }
    }
}

/// Bridges this crate's [`Error`] into `nom`'s parser error trait so primitive
/// decoders can be driven by `nom` combinators while the public API still
/// returns `qframe::Error`.
impl nom::error::ParseError<&[u8]> for Error {
    fn from_error_kind(input: &[u8], _kind: nom::error::ErrorKind) -> Self {
        Error::Truncated {
            needed: 1,
            available: input.len(),
        }
    }

    fn append(_input: &[u8], _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}
