use alloc::string::String;
use enough::StopReason;

/// Errors that abort a GIF decode.
///
/// Only structural problems end up here. Content-level anomalies (bad LZW
/// data, out-of-range palette indices, unknown extensions under the default
/// policy) are recovered locally and reported as [`DecodeWarning`]s instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GifError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unexpected end of input at offset {offset}: need {needed} bytes, buffer has {len}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("unknown extension label 0x{label:02X} at offset {offset}")]
    UnknownExtensionLabel { label: u8, offset: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for GifError {
    fn from(r: StopReason) -> Self {
        GifError::Cancelled(r)
    }
}

/// Why an LZW stream produced fewer indices than the frame needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LzwFailure {
    #[error("end-of-information code before the last pixel")]
    EarlyEndOfInformation,

    #[error("invalid code {code} (next free code {available})")]
    InvalidCode { code: u16, available: u16 },

    #[error("compressed data ran out")]
    InputExhausted,

    #[error("unsupported minimum code size {0}")]
    UnsupportedCodeSize(u8),
}

/// A recoverable anomaly noticed while decoding.
///
/// Warnings never abort the decode. They are logged through `log::warn!`
/// and kept on the [`crate::Document`] in the order they occurred.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeWarning {
    #[error("unknown extension label 0x{label:02X} at offset {offset}")]
    UnknownExtensionLabel { label: u8, offset: usize },

    #[error("frame {frame}: malformed LZW stream ({cause}), {produced} of {expected} pixels decoded")]
    MalformedLzwStream {
        frame: usize,
        produced: usize,
        expected: usize,
        cause: LzwFailure,
    },

    #[error("frame {frame}: {count} pixels reference colors outside the {table_len}-entry table (first index {first_index})")]
    OutOfRangeColorIndex {
        frame: usize,
        count: usize,
        first_index: u8,
        table_len: usize,
    },

    #[error("frame {frame}: no local or global color table")]
    MissingColorTable { frame: usize },

    #[error("stream ended at offset {offset} without a trailer")]
    MissingTrailer { offset: usize },
}
