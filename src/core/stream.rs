//! # Byte Sinks and Sources
//!
//! The two byte-oriented endpoints the engine works against.
//!
//! A [`Sink`] only needs to accept bytes. A [`Source`] is an [`io::Read`] that can also
//! say how many bytes are readable right now and look ahead without consuming. The
//! availability query is what makes optional-attribute short reads detectable; sources
//! that cannot answer it (plain blocking streams) return `None`.
//!
//! ## Provided endpoints
//! - `Vec<u8>` and [`BytesMut`]: growable in-memory sinks
//! - [`WriterSink`]: adapts any [`io::Write`]
//! - [`ByteSource`]: in-memory [`Bytes`] buffer, reports availability
//! - [`ReaderSource`]: adapts any [`io::Read`], cannot report availability

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::{self, Read, Write};

/// Byte sink written to by codecs during serialization.
pub trait Sink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl Sink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl Sink for BytesMut {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.put_slice(bytes);
        Ok(())
    }
}

/// Sink over an arbitrary writer (socket, file, ...).
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}

/// Byte source read from by codecs during deserialization.
pub trait Source: Read {
    /// Number of bytes readable without blocking, or `None` if this source cannot tell.
    fn available_bytes(&self) -> Option<usize>;

    /// Copy upcoming bytes into `buf` without consuming them.
    ///
    /// Returns how many bytes were copied; fewer than `buf.len()` means the stream ends
    /// (or, for in-memory sources, the buffered data ends) before that point.
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// In-memory source over a received buffer.
#[derive(Debug, Clone, Default)]
pub struct ByteSource {
    buf: Bytes,
}

impl ByteSource {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    pub fn from_static(buf: &'static [u8]) -> Self {
        Self {
            buf: Bytes::from_static(buf),
        }
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Unconsumed part of the buffer.
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }
}

impl Read for ByteSource {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.buf.remaining());
        self.buf.copy_to_slice(&mut out[..n]);
        Ok(n)
    }
}

impl Source for ByteSource {
    fn available_bytes(&self) -> Option<usize> {
        Some(self.buf.remaining())
    }

    fn peek(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.buf.remaining());
        out[..n].copy_from_slice(&self.buf[..n]);
        Ok(n)
    }
}

/// Source over a blocking reader.
///
/// Peeked bytes are kept in a pushback buffer and handed out again by the next reads.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    pushback: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: Vec::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ReaderSource<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.pushback.is_empty() {
            return self.inner.read(out);
        }
        let n = out.len().min(self.pushback.len());
        out[..n].copy_from_slice(&self.pushback[..n]);
        self.pushback.drain(..n);
        Ok(n)
    }
}

impl<R: Read> Source for ReaderSource<R> {
    fn available_bytes(&self) -> Option<usize> {
        None
    }

    fn peek(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let mut chunk = [0u8; 64];
        while self.pushback.len() < out.len() {
            let want = (out.len() - self.pushback.len()).min(chunk.len());
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => self.pushback.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        let n = out.len().min(self.pushback.len());
        out[..n].copy_from_slice(&self.pushback[..n]);
        Ok(n)
    }
}
