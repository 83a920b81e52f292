//! Newline splitting over a chunked byte stream.
//!
//! [`LineBuffer`] is the push side: feed it whatever chunk the transport hands
//! over and pop complete lines. [`ChunkedLines`] is the pull side: it reads
//! fixed-size chunks from any `Read` and yields lines lazily. Lines keep their
//! `\n` terminator; only the last one may lack it.

use std::io::{self, Read};

/// Read size used when none is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Largest accepted read size; libcurl's receive buffer tops out here too.
pub const MAX_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Accumulating buffer with a read cursor.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    /// Start of the first byte not yet handed out.
    cursor: usize,
    /// Everything in `cursor..scanned` is known to contain no newline.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Consumed bytes are dropped first so the buffer only
    /// ever holds the unterminated remainder plus the new chunk.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.cursor > 0 {
            self.buf.drain(..self.cursor);
            self.scanned -= self.cursor;
            self.cursor = 0;
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Next complete line, including its `\n`.
    pub fn next_line(&mut self) -> Option<&[u8]> {
        match self.buf[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let start = self.cursor;
                self.cursor = self.scanned + pos + 1;
                self.scanned = self.cursor;
                Some(&self.buf[start..self.cursor])
            }
            None => {
                self.scanned = self.buf.len();
                None
            }
        }
    }

    /// Whatever is left once the stream is exhausted (no trailing newline).
    /// Call after `next_line` has returned `None`.
    pub fn finish(&mut self) -> Option<&[u8]> {
        if self.cursor >= self.buf.len() {
            return None;
        }
        let start = self.cursor;
        self.cursor = self.buf.len();
        self.scanned = self.cursor;
        Some(&self.buf[start..])
    }
}

enum State {
    Reading,
    Drained,
    Done,
}

/// Lazy, non-restartable line iterator over a reader.
pub struct ChunkedLines<R> {
    reader: R,
    chunk: Vec<u8>,
    lines: LineBuffer,
    state: State,
}

impl<R: Read> ChunkedLines<R> {
    /// `chunk_size` of zero is bumped to one byte.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0u8; chunk_size.max(1)],
            lines: LineBuffer::new(),
            state: State::Reading,
        }
    }
}

impl<R: Read> Iterator for ChunkedLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::Drained => {
                    self.state = State::Done;
                    return self.lines.finish().map(|rest| Ok(rest.to_vec()));
                }
                State::Reading => {
                    if let Some(line) = self.lines.next_line() {
                        return Some(Ok(line.to_vec()));
                    }
                    match self.reader.read(&mut self.chunk) {
                        Ok(0) => self.state = State::Drained,
                        Ok(n) => self.lines.push(&self.chunk[..n]),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => {
                            self.state = State::Done;
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
    }
}
