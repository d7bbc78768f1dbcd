use std::io::{self, ErrorKind, Read};

use crate::{BufferedUtf8Reader, Utf16Read, Utf8Reader};

/// Which reader a test runs against.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Variant {
    Unbuffered,
    Buffered(usize),
}

impl Variant {
    pub(crate) fn open<'a>(self, source: impl Read + 'a) -> Box<dyn Utf16Read + 'a> {
        match self {
            Variant::Unbuffered => Box::new(Utf8Reader::new(source)),
            Variant::Buffered(capacity) => {
                Box::new(BufferedUtf8Reader::with_capacity(source, capacity).unwrap())
            }
        }
    }
}

/// Hands out at most `chunk` bytes per read.
pub(crate) struct Chunked<'a> {
    bytes: &'a [u8],
    chunk: usize,
}

impl<'a> Chunked<'a> {
    pub(crate) fn new(bytes: &'a [u8], chunk: usize) -> Self {
        assert!(chunk > 0);
        Self { bytes, chunk }
    }
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.bytes.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

/// Yields `bytes`, then fails every read with `kind`.
pub(crate) struct FailAfter<'a> {
    pub(crate) bytes: &'a [u8],
    pub(crate) kind: ErrorKind,
}

impl Read for FailAfter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.bytes.is_empty() {
            return Err(io::Error::new(self.kind, "source failed"));
        }
        let n = buf.len().min(self.bytes.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

/// Interrupts every other read.
pub(crate) struct Interrupting<'a> {
    pub(crate) bytes: &'a [u8],
    pub(crate) interrupt: bool,
}

impl Read for Interrupting<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(ErrorKind::Interrupted.into());
        }
        let n = buf.len().min(self.bytes.len()).min(1);
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

/// Reads units one call at a time until end of stream.
pub(crate) fn drain_units(reader: &mut dyn Utf16Read) -> Vec<u16> {
    let mut out = Vec::new();
    while let Some(unit) = reader.read_unit().unwrap() {
        out.push(unit);
    }
    out
}

/// Reads through `read_into` with a destination of `step` units.
pub(crate) fn drain_chunks(reader: &mut dyn Utf16Read, step: usize) -> Vec<u16> {
    let mut buf = vec![0u16; step];
    let mut out = Vec::new();
    while let Some(read) = reader.read_units(&mut buf).unwrap() {
        assert!(read > 0 && read <= step);
        out.extend_from_slice(&buf[..read]);
    }
    out
}

pub(crate) fn render(units: &[u16]) -> String {
    units
        .iter()
        .map(|unit| format!("{unit:04X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
