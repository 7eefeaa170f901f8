//! Flat byte layout shared by every configuration record.
//!
//! - `u8` is written as-is.
//! - `i32` is little-endian, four bytes.
//! - strings are a 7-bit variable-length byte count followed by UTF-8 bytes.
//!
//! Counts read back through [`RecordReader::read_count`] are bounded against
//! the bytes still available, so a hostile count can never drive allocation.

use bytes::{Buf, BufMut, BytesMut};

use crate::utilities::errors::DecodeError;

/// Maximum number of bytes a 7-bit length prefix may occupy (covers `i32::MAX`).
const MAX_PREFIX_BYTES: usize = 5;

// ---------------------------------------------------------------------------
// RecordWriter
// ---------------------------------------------------------------------------

/// Append-only encoder for record fields.
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: BytesMut,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    /// Write an element count. Counts beyond `i32::MAX` saturate.
    pub fn write_count(&mut self, count: usize) {
        self.write_i32(i32::try_from(count).unwrap_or(i32::MAX));
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) {
        let mut len = value.len();
        while len >= 0x80 {
            self.buf.put_u8((len as u8 & 0x7F) | 0x80);
            len >>= 7;
        }
        self.buf.put_u8(len as u8);
        self.buf.put_slice(value.as_bytes());
    }

    pub fn write_strs<S: AsRef<str>>(&mut self, values: &[S]) {
        self.write_count(values.len());
        for value in values {
            self.write_str(value.as_ref());
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

// ---------------------------------------------------------------------------
// RecordReader
// ---------------------------------------------------------------------------

/// Bounds-checked decoder over a borrowed byte slice.
#[derive(Debug)]
pub struct RecordReader<'a> {
    buf: &'a [u8],
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { buf: bytes }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < needed {
            return Err(DecodeError::Truncated {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    /// Read an element count and check it against the remaining bytes.
    ///
    /// Every element is a string with at least one prefix byte, so a count
    /// larger than what is left can never be satisfied.
    pub fn read_count(&mut self) -> Result<usize, DecodeError> {
        let raw = self.read_i32()?;
        if raw < 0 {
            return Err(DecodeError::NegativeCount(raw));
        }
        let count = raw as usize;
        if count > self.remaining() {
            return Err(DecodeError::CountExceedsRemaining {
                count,
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }

    fn read_len_prefix(&mut self) -> Result<usize, DecodeError> {
        let mut value: u64 = 0;
        for i in 0..MAX_PREFIX_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                if value > i32::MAX as u64 {
                    return Err(DecodeError::LengthPrefixOverflow);
                }
                return Ok(value as usize);
            }
        }
        Err(DecodeError::LengthPrefixOverflow)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_len_prefix()?;
        self.need(len)?;
        let text = std::str::from_utf8(&self.buf[..len])
            .map_err(|_| DecodeError::InvalidUtf8)?
            .to_string();
        self.buf.advance(len);
        Ok(text)
    }

    pub fn read_strings(&mut self) -> Result<Vec<String>, DecodeError> {
        let count = self.read_count()?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_string()?);
        }
        Ok(values)
    }

    /// Consume the reader, rejecting leftover bytes.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}
