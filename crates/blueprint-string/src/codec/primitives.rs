//! Primitive decoding for the blueprint binary stream.
//!
//! Two varint schemes share the stream and are not interchangeable:
//! structural integers are capped at three 7-bit groups, while text length
//! prefixes use an unbounded-style scheme limited only to the 32-bit range.

use crate::error::DecodeError;
use crate::limits::{MAX_LENGTH_PREFIX_GROUPS, MAX_VARUINT_GROUPS};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding the decompressed blueprint stream.
///
/// Wraps a byte slice and provides bounds-checked reads. The position only
/// moves forward, and a failed read never moves it past the end of the data.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.is_exhausted() {
            return Err(DecodeError::Exhausted { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    ///
    /// Asking for exactly the remaining bytes succeeds; asking for more fails
    /// without consuming anything.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::Exhausted { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned varint of at most three 7-bit groups.
    #[inline]
    pub fn read_var_uint(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        let mut result: u32 = 0;
        for group in 0..MAX_VARUINT_GROUPS {
            let byte = self.read_byte(context)?;
            result |= u32::from(byte & 0x7F) << (7 * group);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(DecodeError::VarIntTooLarge { context })
    }

    /// Reads a signed varint (zigzag encoded).
    pub fn read_var_int(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        let unsigned = self.read_var_uint(context)?;
        Ok(zigzag_decode(unsigned))
    }

    /// Reads a count, size or ID.
    ///
    /// Same wire format as [`read_var_uint`](Self::read_var_uint); the value
    /// can never be negative, so this only widens it for indexing.
    #[inline]
    pub fn read_non_negative(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        Ok(self.read_var_uint(context)? as usize)
    }

    /// Reads a boolean. Any non-zero byte is true.
    pub fn read_bool(&mut self, context: &'static str) -> Result<bool, DecodeError> {
        Ok(self.read_byte(context)? != 0)
    }

    /// Reads a text length prefix (7-bit groups, up to the 32-bit range).
    fn read_length_prefix(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        let mut result: u32 = 0;
        for group in 0..MAX_LENGTH_PREFIX_GROUPS {
            let byte = self.read_byte(context)?;
            // Bits shifted past 32 are dropped, matching the game's encoder.
            result |= u32::from(byte & 0x7F) << (7 * group);
            if byte & 0x80 == 0 {
                return Ok(result as usize);
            }
        }
        Err(DecodeError::InvalidLengthPrefix { context })
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_text(&mut self, context: &'static str) -> Result<String, DecodeError> {
        let len = self.read_length_prefix(context)?;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_bytes(len, context)?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { context })
    }
}

// =============================================================================
// ZIGZAG ENCODING
// =============================================================================

/// Decodes a zigzag-encoded unsigned integer back to signed.
///
/// 0 -> 0, 1 -> -1, 2 -> 1, 3 -> -2, 4 -> 2, ...
#[inline]
pub fn zigzag_decode(n: u32) -> i32 {
    ((n >> 1) as i32) ^ (-((n & 1) as i32))
}

// =============================================================================
// ENCODING (test fixtures only)
// =============================================================================

#[cfg(test)]
pub(crate) fn zigzag_encode(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Writer for building raw streams in tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct Writer {
    buf: Vec<u8>,
}

#[cfg(test)]
impl Writer {
    pub(crate) fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned varint with no group cap.
    pub(crate) fn write_varint(&mut self, mut value: u64) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    pub(crate) fn write_var_int(&mut self, value: i32) {
        self.write_varint(u64::from(zigzag_encode(value)));
    }

    pub(crate) fn write_text(&mut self, s: &str) {
        self.write_varint(s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
    }
}
