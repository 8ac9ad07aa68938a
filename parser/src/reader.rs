//! Component A: the byte reader.
//!
//! A buffered, position-tracking, endian-aware reader over an in-memory
//! byte source of known total length. Every successful operation
//! advances `position` by exactly the bytes it consumed; every failed
//! operation advances by zero — a request for more than `remaining()`
//! fails without partially consuming the source.
//!
//! Backed by `&[u8]` rather than a generic `Read`: a fully-loaded DICOM
//! instance already is a buffer of known total length, and look-ahead
//! (`peek`) is far simpler to implement correctly over a slice than over
//! a `Read` stream.

use dicom_core::error::{InsufficientBytesSnafu, Result};

/// Byte order used to interpret multi-byte primitive reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least-significant byte first.
    LittleEndian,
    /// Most-significant byte first.
    BigEndian,
}

impl ByteOrder {
    fn from_little_endian(little_endian: bool) -> Self {
        if little_endian {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }
}

/// A position-tracking reader over a byte slice of known total size.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: u64,
    byte_order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    /// Build a reader over the given byte slice, defaulting to
    /// little-endian byte order.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            position: 0,
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// The reader's current byte offset from the start of the source.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The number of bytes left unread.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.data.len() as u64 - self.position
    }

    /// Set the byte order used by subsequent `read_u16`/`read_u32` calls.
    pub fn set_byte_order(&mut self, little_endian: bool) {
        self.byte_order = ByteOrder::from_little_endian(little_endian);
    }

    /// Whether the reader is currently configured for little-endian
    /// reads.
    pub fn is_little_endian(&self) -> bool {
        self.byte_order == ByteOrder::LittleEndian
    }

    fn require(&self, n: usize) -> Result<()> {
        if n as u64 > self.remaining() {
            return InsufficientBytesSnafu {
                offset: self.position,
                needed: n,
                available: self.remaining() as usize,
            }
            .fail();
        }
        Ok(())
    }

    /// Look ahead at the next `n` bytes without advancing the position.
    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        self.require(n)?;
        let start = self.position as usize;
        Ok(&self.data[start..start + n])
    }

    /// Advance the position by `n` bytes without returning them.
    pub fn discard(&mut self, n: usize) -> Result<()> {
        self.require(n)?;
        self.position += n as u64;
        Ok(())
    }

    /// Read exactly `n` bytes, advancing the position by `n`.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.position += n as u64;
        Ok(bytes)
    }

    /// Read a `u16` in the reader's current byte order.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_exact(2)?;
        let arr = [bytes[0], bytes[1]];
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => u16::from_le_bytes(arr),
            ByteOrder::BigEndian => u16::from_be_bytes(arr),
        })
    }

    /// Read a `u32` in the reader's current byte order.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_exact(4)?;
        let arr = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => u32::from_le_bytes(arr),
            ByteOrder::BigEndian => u32::from_be_bytes(arr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position_by_exactly_what_they_consume() {
        let mut r = ByteReader::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(r.position(), 0);
        r.read_u16().unwrap();
        assert_eq!(r.position(), 2);
        r.discard(1).unwrap();
        assert_eq!(r.position(), 3);
        let bytes = r.read_exact(2).unwrap();
        assert_eq!(bytes, &[0x04, 0x05]);
        assert_eq!(r.position(), 5);
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn failed_read_does_not_advance_position() {
        let mut r = ByteReader::new(&[0x01, 0x02]);
        let err = r.read_u32();
        assert!(err.is_err());
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn peek_does_not_advance() {
        let r = ByteReader::new(&[0xAA, 0xBB, 0xCC]);
        let bytes = r.peek(2).unwrap();
        assert_eq!(bytes, &[0xAA, 0xBB]);
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn endianness_affects_multi_byte_reads() {
        let mut le = ByteReader::new(&[0x34, 0x12]);
        assert_eq!(le.read_u16().unwrap(), 0x1234);

        let mut be = ByteReader::new(&[0x34, 0x12]);
        be.set_byte_order(false);
        assert_eq!(be.read_u16().unwrap(), 0x3412);
    }
}
