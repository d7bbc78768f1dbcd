#![no_main]
use std::io::{self, Read};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use utf8units::{BufferedUtf8Reader, Utf16Read, Utf8Reader};

#[derive(Debug, Arbitrary)]
struct Input {
    /// Largest read the source hands out, plus one.
    chunk: u8,
    /// Buffer capacity above the minimum of four.
    capacity: u16,
    /// Destination size for bulk reads, plus one.
    step: u8,
    /// Units to skip before draining.
    skip: u8,
    bytes: Vec<u8>,
}

/// Splits reads at a fixed size so that sequences straddle refills.
struct Chunked<'a> {
    bytes: &'a [u8],
    chunk: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.bytes.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        self.bytes = &self.bytes[n..];
        Ok(n)
    }
}

fn drain(reader: &mut dyn Utf16Read, step: usize, skip: u64) -> (u64, Vec<u16>) {
    let skipped = reader.skip(skip).expect("skip failed");
    let mut buf = vec![0u16; step];
    let mut out = Vec::new();
    while let Some(read) = reader.read_units(&mut buf).expect("read failed") {
        assert!(read > 0 && read <= step);
        out.extend_from_slice(&buf[..read]);
    }
    assert_eq!(reader.read_unit().expect("read failed"), None);
    (skipped, out)
}

fuzz_target!(|input: Input| {
    let chunk = usize::from(input.chunk) + 1;
    let capacity = usize::from(input.capacity % 4096) + 4;
    let step = usize::from(input.step) + 1;
    let skip = u64::from(input.skip);

    let mut unbuffered = Utf8Reader::new(Chunked {
        bytes: &input.bytes,
        chunk,
    });
    let mut buffered = BufferedUtf8Reader::with_capacity(
        Chunked {
            bytes: &input.bytes,
            chunk,
        },
        capacity,
    )
    .expect("capacity is at least four");

    let expected = drain(&mut unbuffered, 1, skip);
    let actual = drain(&mut buffered, step, skip);
    assert_eq!(expected, actual);

    if let Ok(text) = std::str::from_utf8(&input.bytes) {
        let mut reader = Utf8Reader::new(input.bytes.as_slice());
        assert_eq!(drain(&mut reader, step, 0).1, text.encode_utf16().collect::<Vec<_>>());
    }
});
