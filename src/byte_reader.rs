//! Buffered byte source with one byte of pushback.
//!
//! The language treats its input as raw 8-bit bytes with ASCII classification, so the reader
//! hands out bytes rather than decoded characters.

use std::io::prelude::*;
use std::io::{self, Bytes};

/// Reads bytes one at a time from a buffered reader.
///
/// Scanning several token classes requires reading one byte past the end of the token; the
/// reader owns that single byte of lookahead and takes it back through [`ByteReader::unget`].
#[derive(Debug)]
pub struct ByteReader<R: BufRead> {
    input: Bytes<R>,
    pushback: Option<u8>,
}

impl<R: BufRead> ByteReader<R> {
    pub fn new(input: R) -> ByteReader<R> {
        ByteReader {
            input: input.bytes(),
            pushback: None,
        }
    }

    /// Return the next byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        self.input.next().transpose()
    }

    /// Push `byte` back so the next call to [`ByteReader::next_byte`] returns it again.
    ///
    /// The pushback slot holds a single byte; it must be empty when this is called.
    pub fn unget(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none());
        self.pushback = Some(byte);
    }
}
