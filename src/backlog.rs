//! Buffering of undecoded source bytes.
//!
//! [`ByteBacklog`] holds bytes that were read from the source but not parsed
//! yet. Bytes leave it strictly from the front and in order. The unread region
//! is kept contiguous so a whole frame can be handed to the decoder as one
//! slice; consumed space at the front is reclaimed lazily when appending, which
//! keeps consumption O(1) amortized even for very long streams.
//!
//! [`ChunkReader`] pulls fixed-size chunks from any [`Read`] into a backlog.

use std::io::{self, Read};
use std::mem;

pub(crate) struct ByteBacklog {
    buf: Vec<u8>,
    head: usize,
    /// Copy of every consumed byte, kept only when raw passthrough is enabled.
    consumed: Option<Vec<u8>>,
}

impl ByteBacklog {
    pub(crate) fn new(record_consumed: bool) -> Self {
        ByteBacklog {
            buf: Vec::new(),
            head: 0,
            consumed: record_consumed.then(Vec::new),
        }
    }

    /// Number of buffered bytes that have not been consumed.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buf.len() - self.head
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All unconsumed bytes, oldest first.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[self.head..]
    }

    /// The first `n` unconsumed bytes, or `None` if fewer are buffered.
    #[inline]
    pub(crate) fn peek(&self, n: usize) -> Option<&[u8]> {
        self.as_slice().get(..n)
    }

    /// Appends a chunk read from the source.
    pub(crate) fn append(&mut self, chunk: &[u8]) {
        // Reclaim the consumed prefix once it dominates the allocation.
        if self.head > 0 && self.head >= self.buf.len() / 2 {
            self.buf.drain(..self.head);
            self.head = 0;
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Drops `n` bytes from the front.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` bytes are buffered.
    pub(crate) fn consume(&mut self, n: usize) {
        assert!(n <= self.len(), "consumed past the end of the backlog");
        if let Some(consumed) = self.consumed.as_mut() {
            consumed.extend_from_slice(&self.buf[self.head..self.head + n]);
        }
        self.head += n;
        if self.head == self.buf.len() {
            self.buf.clear();
            self.head = 0;
        }
    }

    /// Consumes everything still buffered and returns how many bytes that was.
    pub(crate) fn consume_all(&mut self) -> usize {
        let remaining = self.len();
        self.consume(remaining);
        remaining
    }

    /// Takes the bytes consumed since the last call. Always empty when
    /// recording is disabled.
    pub(crate) fn take_consumed(&mut self) -> Vec<u8> {
        self.consumed.as_mut().map(mem::take).unwrap_or_default()
    }

    /// Drops the bytes consumed since the last call, keeping recording on.
    pub(crate) fn discard_consumed(&mut self) {
        if let Some(consumed) = self.consumed.as_mut() {
            consumed.clear();
        }
    }

    /// Whether consumed bytes are waiting in the recording.
    pub(crate) fn has_consumed(&self) -> bool {
        self.consumed.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Pulls fixed-size chunks from a byte source into a [`ByteBacklog`].
pub(crate) struct ChunkReader<R> {
    inner: R,
    chunk: Vec<u8>,
    exhausted: bool,
}

impl<R: Read> ChunkReader<R> {
    pub(crate) fn new(inner: R, chunk_size: usize) -> Self {
        ChunkReader {
            inner,
            chunk: vec![0; chunk_size],
            exhausted: false,
        }
    }

    /// Reads one chunk into `backlog`.
    ///
    /// Returns `Ok(false)` once the source is exhausted. Interrupted reads are
    /// retried; every other source error is returned unchanged.
    pub(crate) fn fill(&mut self, backlog: &mut ByteBacklog) -> io::Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        loop {
            match self.inner.read(&mut self.chunk) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(n) => {
                    backlog.append(&self.chunk[..n]);
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads chunks until `backlog` holds at least `n` bytes.
    ///
    /// Returns `Ok(false)` if the source ran dry first.
    pub(crate) fn fill_to(&mut self, backlog: &mut ByteBacklog, n: usize) -> io::Result<bool> {
        while backlog.len() < n {
            if !self.fill(backlog)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<R> ChunkReader<R> {
    pub(crate) fn get_ref(&self) -> &R {
        &self.inner
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }
}
