use std::io::{self, ErrorKind, Read};

use crate::utf8::{self, ASCII_WINDOW, MAX_SEQUENCE_LEN, Step};

/// Fixed-capacity byte window over a source.
///
/// `bytes[pos..pos + len]` are the resident, not yet decoded bytes.
#[derive(Debug)]
pub(crate) struct ByteBuffer {
    bytes: Box<[u8]>,
    pos: usize,
    len: usize,
}

impl ByteBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity >= MAX_SEQUENCE_LEN);
        Self {
            bytes: vec![0; capacity].into_boxed_slice(),
            pos: 0,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn resident(&self) -> &[u8] {
        &self.bytes[self.pos..self.pos + self.len]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The next eight resident bytes, if `pos` sits on an eight byte
    /// boundary and that many are resident.
    #[inline]
    pub(crate) fn aligned_window(&self) -> Option<&[u8; ASCII_WINDOW]> {
        if self.pos % ASCII_WINDOW != 0 {
            return None;
        }
        self.resident().first_chunk()
    }

    /// Whether the next sequence can be decoded (or rejected) without I/O.
    pub(crate) fn has_decidable_sequence(&self) -> bool {
        if self.len >= MAX_SEQUENCE_LEN {
            return true;
        }
        !matches!(utf8::decode(self.resident()), Step::Incomplete)
    }

    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.pos += n;
        self.len -= n;
    }

    /// Moves the resident bytes to the start of the buffer.
    fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        self.bytes.copy_within(self.pos..self.pos + self.len, 0);
        tracing::trace!(from = self.pos, resident = self.len, "compacted buffer");
        self.pos = 0;
    }

    /// Compacts, then reads once from `source` into the free tail. Returns the
    /// number of bytes read; `0` means the source is exhausted.
    ///
    /// Only called with fewer than [`MAX_SEQUENCE_LEN`] bytes resident, so
    /// after compaction the tail is never empty.
    pub(crate) fn refill<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<usize> {
        debug_assert!(self.len < MAX_SEQUENCE_LEN);
        self.compact();
        let start = self.pos + self.len;
        loop {
            match source.read(&mut self.bytes[start..]) {
                Ok(read) => {
                    self.len += read;
                    tracing::trace!(read, resident = self.len, "refilled buffer");
                    return Ok(read);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Drops the storage.
    pub(crate) fn release(&mut self) {
        self.bytes = Box::default();
        self.pos = 0;
        self.len = 0;
    }
}
