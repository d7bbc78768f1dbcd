//! Stateless UTF-8 primitives shared by both readers.
//!
//! - [`classify`] maps a lead byte to the length of the sequence it starts.
//! - [`accepts`] checks one trailing byte against the shortest-form table of
//!   Unicode Corrigendum #1, which rules out overlong forms and scalars above
//!   `U+10FFFF`. Testing only for the `10xxxxxx` pattern is not enough: it
//!   admits e.g. `E0 80 80`.
//! - [`decode`] runs both over the front of a byte slice and reports how many
//!   bytes the attempt consumed, so callers resynchronize without re-reading.
//! - [`split`] turns a scalar into one or two UTF-16 code units.
//! - [`is_ascii_window`]/[`widen_ascii`] are the 8-byte ASCII fast path.
//!
//! Table of valid sequences:
//!
//! | lead        | 2nd byte    | 3rd byte    | 4th byte    |
//! |-------------|-------------|-------------|-------------|
//! | `00..=7F`   |             |             |             |
//! | `C2..=DF`   | `80..=BF`   |             |             |
//! | `E0`        | `A0..=BF`   | `80..=BF`   |             |
//! | `E1..=EF`   | `80..=BF`   | `80..=BF`   |             |
//! | `F0`        | `90..=BF`   | `80..=BF`   | `80..=BF`   |
//! | `F1..=F3`   | `80..=BF`   | `80..=BF`   | `80..=BF`   |
//! | `F4`        | `80..=8F`   | `80..=BF`   | `80..=BF`   |

use crate::error::MalformedInput;

/// The longest UTF-8 sequence in bytes.
pub const MAX_SEQUENCE_LEN: usize = 4;

/// U+FFFD as a UTF-16 code unit.
pub const REPLACEMENT: u16 = 0xFFFD;

/// Width of the ASCII bulk path in bytes.
pub const ASCII_WINDOW: usize = 8;

const HIGH_BITS: u64 = 0x8080_8080_8080_8080;

/// Returns the length of the sequence started by `lead`, or `None` if `lead`
/// cannot start a sequence.
///
/// `0xC0` and `0xC1` only ever start overlong encodings and `0xF5..=0xFF`
/// would encode scalars above `U+10FFFF`, so both are rejected along with bare
/// continuation bytes.
#[must_use]
pub const fn classify(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Whether `byte` is of the form `10xxxxxx`.
#[must_use]
pub const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Whether `byte` may follow `lead` at position `index` (1 for the byte right
/// after the lead).
#[must_use]
pub const fn accepts(lead: u8, index: usize, byte: u8) -> bool {
    if index != 1 {
        return is_continuation(byte);
    }
    match lead {
        0xE0 => matches!(byte, 0xA0..=0xBF),
        0xF0 => matches!(byte, 0x90..=0xBF),
        0xF4 => matches!(byte, 0x80..=0x8F),
        _ => is_continuation(byte),
    }
}

/// Whether `sequence` is exactly one well-formed UTF-8 sequence.
#[must_use]
pub fn validate(sequence: &[u8]) -> bool {
    matches!(decode(sequence), Step::Scalar { len, .. } if len == sequence.len())
}

/// The payload bits of a lead byte for a sequence of `len` bytes.
pub(crate) const fn lead_payload(lead: u8, len: usize) -> u32 {
    let mask = match len {
        1 => 0x7F,
        2 => 0x1F,
        3 => 0x0F,
        _ => 0x07,
    };
    (lead & mask) as u32
}

pub(crate) const fn push_continuation(acc: u32, byte: u8) -> u32 {
    (acc << 6) | (byte & 0x3F) as u32
}

/// Outcome of decoding the sequence at the front of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A scalar value spanning `len` bytes.
    Scalar {
        /// The decoded scalar.
        cp: u32,
        /// Bytes consumed.
        len: usize,
    },
    /// The sequence is malformed. Only the `consumed` bytes that were accepted
    /// belong to it; the rest of the input may start a valid sequence.
    Malformed {
        /// Bytes to drop before decoding resumes. Always at least 1.
        consumed: usize,
        /// What went wrong.
        error: MalformedInput,
    },
    /// The slice ends inside a sequence that is valid so far (or is empty).
    Incomplete,
}

/// Decodes the sequence at the front of `bytes`.
#[must_use]
pub fn decode(bytes: &[u8]) -> Step {
    let Some(&lead) = bytes.first() else {
        return Step::Incomplete;
    };
    let Some(len) = classify(lead) else {
        return Step::Malformed {
            consumed: 1,
            error: MalformedInput::InvalidLeadByte(lead),
        };
    };
    let mut cp = lead_payload(lead, len);
    for index in 1..len {
        let Some(&byte) = bytes.get(index) else {
            return Step::Incomplete;
        };
        if !accepts(lead, index, byte) {
            return Step::Malformed {
                consumed: index,
                error: MalformedInput::InvalidContinuation { lead, byte },
            };
        }
        cp = push_continuation(cp, byte);
    }
    Step::Scalar { cp, len }
}

/// A scalar as UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    /// A BMP scalar.
    One(u16),
    /// A supplementary scalar as a surrogate pair.
    Pair {
        /// The high (leading) surrogate.
        high: u16,
        /// The low (trailing) surrogate.
        low: u16,
    },
}

/// Splits `cp` into UTF-16 code units. `cp` must not exceed `0x10FFFF`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn split(cp: u32) -> Units {
    debug_assert!(cp <= 0x10_FFFF, "scalar out of range: {cp:#X}");
    match u16::try_from(cp) {
        Ok(unit) => Units::One(unit),
        Err(_) => {
            let offset = cp - 0x1_0000;
            Units::Pair {
                high: 0xD800 + (offset >> 10) as u16,
                low: 0xDC00 + (offset & 0x3FF) as u16,
            }
        }
    }
}

/// Whether all eight bytes of `window` are ASCII.
///
/// One 64-bit mask test; the load goes through `from_ne_bytes` so it does not
/// depend on the window's alignment.
#[must_use]
#[inline]
pub fn is_ascii_window(window: &[u8; ASCII_WINDOW]) -> bool {
    u64::from_ne_bytes(*window) & HIGH_BITS == 0
}

/// Widens eight ASCII bytes into eight code units.
#[inline]
pub fn widen_ascii(window: &[u8; ASCII_WINDOW], dst: &mut [u16; ASCII_WINDOW]) {
    for (unit, &byte) in dst.iter_mut().zip(window) {
        *unit = u16::from(byte);
    }
}
