//! Buffered reader.
//!
//! Bytes are pulled from the source into a [`ByteBuffer`] and decoded from
//! there. A sequence that straddles the end of the resident bytes is moved to
//! the front of the buffer and completed by the next refill, so the decoder
//! only ever looks at whole sequences, truncated ones at end of stream
//! included.
//!
//! `read_into` and `skip` try an eight byte ASCII step first: when the buffer
//! position and (for reads) the destination index are multiples of eight and
//! the next eight bytes have their high bit clear, all eight are handled at
//! once. Otherwise they fall back to one sequence at a time. The output is the
//! same either way.
//!
//! `read_into` never blocks once it has produced a unit: if the next sequence
//! needs a refill it returns what it has.

use std::io::Read;

use crate::buffer::ByteBuffer;
use crate::error::{DecodeError, MalformedInput, Result};
use crate::options::DecoderOptions;
use crate::read::{Utf16Read, destination, recover};
use crate::utf8::{self, ASCII_WINDOW, Step, Units};

/// Decodes UTF-8 from a byte source through an internal buffer.
///
/// Not thread-safe.
#[derive(Debug)]
pub struct BufferedUtf8Reader<R> {
    source: Option<R>,
    buffer: ByteBuffer,
    pending: Option<u16>,
    deferred: Option<DecodeError>,
    strict: bool,
}

/// What the buffer holds after [`BufferedUtf8Reader::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    /// The next sequence can be decided from resident bytes.
    Ready,
    /// The source is exhausted with an incomplete sequence resident.
    Truncated,
    /// The source is exhausted and nothing is resident.
    Exhausted,
}

impl<R: Read> BufferedUtf8Reader<R> {
    /// Creates a lenient reader over `source` with an 8 KiB buffer.
    pub fn new(source: R) -> Self {
        let options = DecoderOptions::default();
        Self::build(source, options)
    }

    /// Creates a lenient reader over `source` with a buffer of `capacity`
    /// bytes.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidArgument`] if `capacity` is below 4.
    pub fn with_capacity(source: R, capacity: usize) -> Result<Self> {
        Self::with_options(
            source,
            DecoderOptions {
                buffer_size: capacity,
                ..DecoderOptions::default()
            },
        )
    }

    /// Creates a reader over `source`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::InvalidArgument`] if `options.buffer_size` is below 4.
    pub fn with_options(source: R, options: DecoderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(source, options))
    }

    fn build(source: R, options: DecoderOptions) -> Self {
        Self {
            source: Some(source),
            buffer: ByteBuffer::with_capacity(options.buffer_size),
            pending: None,
            deferred: None,
            strict: options.strict,
        }
    }

    /// Capacity of the internal buffer in bytes; `0` once closed.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    fn begin(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(DecodeError::Closed);
        }
        match self.deferred.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Refills until the next sequence is decidable or the source runs dry.
    fn fill(&mut self) -> Result<Fill> {
        while !self.buffer.has_decidable_sequence() {
            let source = self.source.as_mut().ok_or(DecodeError::Closed)?;
            if self.buffer.refill(source)? == 0 {
                return Ok(if self.buffer.is_empty() {
                    Fill::Exhausted
                } else {
                    Fill::Truncated
                });
            }
        }
        Ok(Fill::Ready)
    }

    fn next_scalar(&mut self) -> Result<Option<u32>> {
        let fill = self.fill()?;
        if fill == Fill::Exhausted {
            return Ok(None);
        }
        let resident = self.buffer.resident();
        let (consumed, decoded) = match utf8::decode(resident) {
            Step::Scalar { cp, len } => (len, Ok(cp)),
            Step::Malformed { consumed, error } => (consumed, Err(error)),
            Step::Incomplete => {
                debug_assert_eq!(fill, Fill::Truncated);
                let lead = resident[0];
                (resident.len(), Err(MalformedInput::Truncated { lead }))
            }
        };
        self.buffer.consume(consumed);
        match decoded {
            Ok(cp) => Ok(Some(cp)),
            Err(error) => recover(self.strict, error).map(Some),
        }
    }
}

impl<R: Read> Utf16Read for BufferedUtf8Reader<R> {
    fn read_unit(&mut self) -> Result<Option<u16>> {
        self.begin()?;
        if let Some(low) = self.pending.take() {
            return Ok(Some(low));
        }
        let Some(cp) = self.next_scalar()? else {
            return Ok(None);
        };
        Ok(Some(match utf8::split(cp) {
            Units::One(unit) => unit,
            Units::Pair { high, low } => {
                self.pending = Some(low);
                high
            }
        }))
    }

    fn read_into(&mut self, buf: &mut [u16], offset: usize, len: usize) -> Result<Option<usize>> {
        self.begin()?;
        let dst = destination(buf, offset, len)?;
        if dst.is_empty() {
            return Ok(Some(0));
        }
        let mut written = 0;
        if let Some(low) = self.pending.take() {
            dst[0] = low;
            written = 1;
        }
        while written < dst.len() {
            if (offset + written) % ASCII_WINDOW == 0 {
                if let (Some(window), Some(out)) = (
                    self.buffer.aligned_window(),
                    dst[written..].first_chunk_mut::<ASCII_WINDOW>(),
                ) {
                    if utf8::is_ascii_window(window) {
                        utf8::widen_ascii(window, out);
                        self.buffer.consume(ASCII_WINDOW);
                        written += ASCII_WINDOW;
                        continue;
                    }
                }
            }
            if let Some(&byte) = self.buffer.resident().first() {
                if byte < 0x80 {
                    dst[written] = u16::from(byte);
                    self.buffer.consume(1);
                    written += 1;
                    continue;
                }
            }
            if written > 0 && !self.buffer.has_decidable_sequence() {
                break;
            }
            match self.next_scalar() {
                Ok(Some(cp)) => match utf8::split(cp) {
                    Units::One(unit) => {
                        dst[written] = unit;
                        written += 1;
                    }
                    Units::Pair { high, low } => {
                        dst[written] = high;
                        written += 1;
                        if written < dst.len() {
                            dst[written] = low;
                            written += 1;
                        } else {
                            self.pending = Some(low);
                        }
                    }
                },
                Ok(None) => break,
                Err(error @ (DecodeError::Malformed(_) | DecodeError::Io(_))) if written > 0 => {
                    self.deferred = Some(error);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok((written > 0).then_some(written))
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        self.begin()?;
        let mut skipped = 0;
        if n > 0 && self.pending.take().is_some() {
            skipped = 1;
        }
        while skipped < n {
            if n - skipped >= ASCII_WINDOW as u64
                && self
                    .buffer
                    .aligned_window()
                    .is_some_and(utf8::is_ascii_window)
            {
                self.buffer.consume(ASCII_WINDOW);
                skipped += ASCII_WINDOW as u64;
                continue;
            }
            match self.next_scalar() {
                Ok(Some(cp)) => match utf8::split(cp) {
                    Units::One(_) => skipped += 1,
                    Units::Pair { low, .. } => {
                        if n - skipped >= 2 {
                            skipped += 2;
                        } else {
                            self.pending = Some(low);
                            skipped += 1;
                        }
                    }
                },
                Ok(None) => break,
                Err(error @ (DecodeError::Malformed(_) | DecodeError::Io(_))) if skipped > 0 => {
                    self.deferred = Some(error);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(skipped)
    }

    fn ready(&self) -> Result<bool> {
        if self.source.is_none() {
            return Err(DecodeError::Closed);
        }
        Ok(self.pending.is_some() || self.deferred.is_some() || self.buffer.has_decidable_sequence())
    }

    fn close(&mut self) -> Result<()> {
        if self.source.take().is_some() {
            self.buffer.release();
            self.pending = None;
            self.deferred = None;
            tracing::debug!("closed buffered reader");
        }
        Ok(())
    }
}
