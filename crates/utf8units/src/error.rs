use std::io;

use thiserror::Error;

/// Errors reported by the readers.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed UTF-8 in strict mode. Lenient readers substitute U+FFFD.
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),
    /// A caller-supplied argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The reader was used after [`close`](crate::Utf16Read::close).
    #[error("reader is closed")]
    Closed,
    /// The byte source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The way a UTF-8 sequence was malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedInput {
    /// A continuation byte, a reserved overlong lead (`0xC0`, `0xC1`) or a lead
    /// above `0xF4`.
    #[error("invalid lead byte 0x{0:02X}")]
    InvalidLeadByte(u8),
    /// A byte outside the range allowed at its position after `lead`.
    #[error("invalid continuation byte 0x{byte:02X} after lead byte 0x{lead:02X}")]
    InvalidContinuation {
        /// The lead byte of the attempted sequence.
        lead: u8,
        /// The rejected byte. It is not consumed.
        byte: u8,
    },
    /// The stream ended inside a sequence.
    #[error("sequence starting with 0x{lead:02X} truncated by end of stream")]
    Truncated {
        /// The lead byte of the attempted sequence.
        lead: u8,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DecodeError>;
