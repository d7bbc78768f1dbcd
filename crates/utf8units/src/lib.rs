//! Streaming UTF-8 to UTF-16 decoding.
//!
//! Two readers turn any [`std::io::Read`] into a pull-based source of UTF-16
//! code units, one scalar at a time, without holding the whole input:
//!
//! - [`Utf8Reader`] reads the source one byte at a time and keeps no buffer.
//! - [`BufferedUtf8Reader`] reads into an internal buffer and copies runs of
//!   ASCII eight bytes at a time.
//!
//! Both implement [`Utf16Read`] and produce identical output for identical
//! input, however the source splits its reads.
//!
//! Malformed input (bare continuation bytes, reserved or out-of-range lead
//! bytes, overlong forms, bad continuation bytes and sequences cut off by end
//! of stream) is replaced by U+FFFD by default. Only the bytes accepted as part
//! of the bad sequence are dropped; decoding resumes at the first byte that did
//! not fit. Set [`DecoderOptions::strict`] to get [`DecodeError::Malformed`]
//! instead.
//!
//! ```
//! use utf8units::{BufferedUtf8Reader, Utf16Read};
//!
//! let bytes: &[u8] = "a€𐍈".as_bytes();
//! let mut reader = BufferedUtf8Reader::new(bytes);
//! let mut units: Vec<u16> = Vec::new();
//! reader.transfer_to(&mut units)?;
//! assert_eq!(units, [0x0061, 0x20AC, 0xD800, 0xDF48]);
//! # Ok::<(), utf8units::DecodeError>(())
//! ```

mod buffer;
mod buffered;
mod error;
mod options;
mod read;
mod unbuffered;
pub mod utf8;

#[cfg(test)]
mod tests;

pub use buffered::BufferedUtf8Reader;
pub use error::{DecodeError, MalformedInput, Result};
pub use options::{DEFAULT_BUFFER_SIZE, DecoderOptions};
pub use read::{UnitSink, Utf16Read};
pub use unbuffered::Utf8Reader;
