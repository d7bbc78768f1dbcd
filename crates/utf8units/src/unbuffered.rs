use std::io::Read;

use crate::error::{DecodeError, MalformedInput, Result};
use crate::options::DecoderOptions;
use crate::read::{Utf16Read, destination, read_byte, recover};
use crate::utf8::{self, Units};

/// Decodes UTF-8 from a byte source one byte per read, without a buffer.
///
/// Holds at most one byte of lookahead (a byte that ended a malformed
/// sequence and is decoded next) and one pending low surrogate. Wrap slow
/// sources in [`BufferedUtf8Reader`](crate::BufferedUtf8Reader) instead.
///
/// Not thread-safe.
#[derive(Debug)]
pub struct Utf8Reader<R> {
    source: Option<R>,
    lookahead: Option<u8>,
    pending: Option<u16>,
    deferred: Option<DecodeError>,
    strict: bool,
}

impl<R: Read> Utf8Reader<R> {
    /// Creates a lenient reader over `source`.
    pub fn new(source: R) -> Self {
        Self::with_options(source, DecoderOptions::default())
    }

    /// Creates a reader over `source`. `options.buffer_size` is ignored.
    pub fn with_options(source: R, options: DecoderOptions) -> Self {
        Self {
            source: Some(source),
            lookahead: None,
            pending: None,
            deferred: None,
            strict: options.strict,
        }
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

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.lookahead.take() {
            return Ok(Some(byte));
        }
        let source = self.source.as_mut().ok_or(DecodeError::Closed)?;
        Ok(read_byte(source)?)
    }

    fn next_scalar(&mut self) -> Result<Option<u32>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let Some(len) = utf8::classify(lead) else {
            return recover(self.strict, MalformedInput::InvalidLeadByte(lead)).map(Some);
        };
        let mut cp = utf8::lead_payload(lead, len);
        for index in 1..len {
            let Some(byte) = self.next_byte()? else {
                return recover(self.strict, MalformedInput::Truncated { lead }).map(Some);
            };
            if !utf8::accepts(lead, index, byte) {
                self.lookahead = Some(byte);
                return recover(self.strict, MalformedInput::InvalidContinuation { lead, byte })
                    .map(Some);
            }
            cp = utf8::push_continuation(cp, byte);
        }
        Ok(Some(cp))
    }

    fn next_unit(&mut self) -> Result<Option<u16>> {
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
}

impl<R: Read> Utf16Read for Utf8Reader<R> {
    fn read_unit(&mut self) -> Result<Option<u16>> {
        self.begin()?;
        self.next_unit()
    }

    fn read_into(&mut self, buf: &mut [u16], offset: usize, len: usize) -> Result<Option<usize>> {
        self.begin()?;
        let dst = destination(buf, offset, len)?;
        if dst.is_empty() {
            return Ok(Some(0));
        }
        let mut written = 0;
        while written < dst.len() {
            match self.next_unit() {
                Ok(Some(unit)) => {
                    dst[written] = unit;
                    written += 1;
                }
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
        while skipped < n {
            match self.next_unit() {
                Ok(Some(_)) => skipped += 1,
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
        let lookahead_decodes = self
            .lookahead
            .is_some_and(|byte| !matches!(utf8::classify(byte), Some(2..)));
        Ok(self.pending.is_some() || self.deferred.is_some() || lookahead_decodes)
    }

    fn close(&mut self) -> Result<()> {
        if self.source.take().is_some() {
            self.lookahead = None;
            self.pending = None;
            self.deferred = None;
            tracing::debug!("closed unbuffered reader");
        }
        Ok(())
    }
}
