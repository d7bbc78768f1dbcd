use std::io::{self, ErrorKind, Read};

use crate::error::{DecodeError, MalformedInput, Result};
use crate::utf8::REPLACEMENT;

const TRANSFER_CHUNK: usize = 512;

/// A pull-based source of UTF-16 code units decoded from UTF-8.
///
/// Supplementary characters come out as a surrogate pair, possibly across two
/// calls: when only the high surrogate fits, the low one is kept and returned
/// first by the next call, without touching the byte source.
///
/// Every method except [`close`](Self::close) fails with
/// [`DecodeError::Closed`] once the reader is closed.
pub trait Utf16Read {
    /// Reads one code unit. `None` means end of stream.
    ///
    /// # Errors
    ///
    /// Source failures, use after close, and malformed input in strict mode.
    fn read_unit(&mut self) -> Result<Option<u16>>;

    /// Reads up to `len` code units into `buf[offset..offset + len]`.
    ///
    /// Returns `Some(0)` only when `len == 0`, and `None` when the stream is
    /// exhausted before a single unit was produced. May return fewer than
    /// `len` units. A source failure or strict-mode error hit after some
    /// units were produced is returned by the next call instead.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidArgument`] when the range does not fit in `buf`,
    /// plus everything [`read_unit`](Self::read_unit) reports.
    fn read_into(&mut self, buf: &mut [u16], offset: usize, len: usize) -> Result<Option<usize>>;

    /// Reads into the whole of `buf`. See [`read_into`](Self::read_into).
    ///
    /// # Errors
    ///
    /// See [`read_into`](Self::read_into).
    fn read_units(&mut self, buf: &mut [u16]) -> Result<Option<usize>> {
        let len = buf.len();
        self.read_into(buf, 0, len)
    }

    /// Skips up to `n` code units and returns how many were skipped.
    ///
    /// Lands on the same position as `n` calls to
    /// [`read_unit`](Self::read_unit), including halfway through a
    /// surrogate pair. Errors after the first skipped unit are held for the
    /// next call, as in [`read_into`](Self::read_into).
    ///
    /// # Errors
    ///
    /// See [`read_unit`](Self::read_unit).
    fn skip(&mut self, n: u64) -> Result<u64>;

    /// Whether the next [`read_unit`](Self::read_unit) is answered without
    /// reading from the source.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Closed`].
    fn ready(&self) -> Result<bool>;

    /// Releases the byte source. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// None at present; the signature leaves room for sources with fallible
    /// shutdown.
    fn close(&mut self) -> Result<()>;

    /// Drains the stream into `sink`, returning the number of units written.
    ///
    /// # Errors
    ///
    /// See [`read_unit`](Self::read_unit); sink failures are reported as
    /// [`DecodeError::Io`].
    fn transfer_to(&mut self, sink: &mut dyn UnitSink) -> Result<u64> {
        let mut chunk = [0u16; TRANSFER_CHUNK];
        let mut transferred = 0u64;
        while let Some(read) = self.read_units(&mut chunk)? {
            sink.write_units(&chunk[..read])?;
            transferred += read as u64;
        }
        Ok(transferred)
    }

    /// Drains the stream into `out`, pairing surrogates. Unpaired surrogates
    /// become U+FFFD. Returns the number of bytes appended.
    ///
    /// # Errors
    ///
    /// See [`read_unit`](Self::read_unit).
    fn read_to_string(&mut self, out: &mut String) -> Result<usize> {
        let mut units: Vec<u16> = Vec::new();
        self.transfer_to(&mut units)?;
        let before = out.len();
        out.extend(
            char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
        );
        Ok(out.len() - before)
    }
}

/// Destination for [`Utf16Read::transfer_to`].
pub trait UnitSink {
    /// Accepts a run of code units.
    ///
    /// # Errors
    ///
    /// Whatever the underlying writer reports.
    fn write_units(&mut self, units: &[u16]) -> io::Result<()>;
}

impl UnitSink for Vec<u16> {
    fn write_units(&mut self, units: &[u16]) -> io::Result<()> {
        self.extend_from_slice(units);
        Ok(())
    }
}

impl<S: UnitSink + ?Sized> UnitSink for &mut S {
    fn write_units(&mut self, units: &[u16]) -> io::Result<()> {
        (**self).write_units(units)
    }
}

/// `buf[offset..offset + len]`, or an error if that range is out of bounds.
pub(crate) fn destination(buf: &mut [u16], offset: usize, len: usize) -> Result<&mut [u16]> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or(DecodeError::InvalidArgument("destination range out of bounds"))
}

/// Applies the malformed-input policy: an error in strict mode, U+FFFD
/// otherwise.
pub(crate) fn recover(strict: bool, error: MalformedInput) -> Result<u32> {
    if strict {
        return Err(error.into());
    }
    tracing::debug!(%error, "substituting replacement character");
    Ok(u32::from(REPLACEMENT))
}

pub(crate) fn read_byte<R: Read + ?Sized>(source: &mut R) -> io::Result<Option<u8>> {
    let mut byte = 0;
    loop {
        match source.read(core::slice::from_mut(&mut byte)) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte)),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
