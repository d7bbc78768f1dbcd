use crate::error::{DecodeError, Result};
use crate::utf8::MAX_SEQUENCE_LEN;

/// Buffer size used by [`BufferedUtf8Reader::new`](crate::BufferedUtf8Reader::new).
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Configuration for the readers.
///
/// # Default
///
/// An 8 KiB buffer and lenient decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderOptions {
    /// Capacity of the internal byte buffer of
    /// [`BufferedUtf8Reader`](crate::BufferedUtf8Reader). Ignored by the
    /// unbuffered reader.
    ///
    /// Must hold the longest UTF-8 sequence, so values below 4 are rejected.
    ///
    /// # Default
    ///
    /// `8192`
    pub buffer_size: usize,

    /// Whether malformed input is reported as
    /// [`DecodeError::Malformed`] instead of being replaced by U+FFFD.
    ///
    /// Either way the reader resynchronizes on the byte following the
    /// accepted prefix of the bad sequence, so decoding can continue after an
    /// error.
    ///
    /// # Default
    ///
    /// `false`
    pub strict: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            strict: false,
        }
    }
}

impl DecoderOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(DecodeError::InvalidArgument("buffer size must be positive"));
        }
        if self.buffer_size < MAX_SEQUENCE_LEN {
            return Err(DecodeError::InvalidArgument("buffer size too small"));
        }
        Ok(())
    }
}
