// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors threaded through one encode or decode pass.
//!
//! A cursor is the only mutable state of a pass. Nested schemas receive the
//! same cursor by reference, so offsets stay global to the outer buffer.

use crate::error::{PackError, Result};

/// Byte order for multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

/// Generate endian-aware write methods for primitive types.
///
/// Each generated method converts the value with `to_be_bytes()` or
/// `to_le_bytes()` and delegates to `write_bytes`, which bounds-checks and
/// advances the offset.
macro_rules! impl_write {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type, endian: Endian) -> Result<()> {
            let bytes = match endian {
                Endian::Big => value.to_be_bytes(),
                Endian::Little => value.to_le_bytes(),
            };
            self.write_bytes(&bytes)
        }
    };
}

/// Generate endian-aware read methods for primitive types.
macro_rules! impl_read {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, endian: Endian) -> Result<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(match endian {
                Endian::Big => <$type>::from_be_bytes(bytes),
                Endian::Little => <$type>::from_le_bytes(bytes),
            })
        }
    };
}

/// Generate common cursor methods (offset, remaining, len).
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }

        /// Total buffer length, independent of the offset.
        pub fn len(&self) -> usize {
            self.buffer.len()
        }

        pub fn is_empty(&self) -> bool {
            self.buffer.is_empty()
        }
    };
}

/// Mutable cursor for writing (bounds-checked).
#[derive(Debug)]
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    impl_write!(write_u16, u16);
    impl_write!(write_i16, i16);
    impl_write!(write_u32, u32);
    impl_write!(write_i32, i32);
    impl_write!(write_u64, u64);

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.check(data.len())?;
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Write `count` copies of `byte`.
    pub fn fill(&mut self, byte: u8, count: usize) -> Result<()> {
        self.check(count)?;
        self.buffer[self.offset..self.offset + count].fill(byte);
        self.offset += count;
        Ok(())
    }

    /// Advance without touching the skipped bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.check(count)?;
        self.offset += count;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.offset]
    }

    fn check(&self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(PackError::encoding(
                self.offset,
                format!(
                    "buffer too small: need {} bytes, have {}",
                    count,
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }

    impl_cursor_common!();
}

/// Immutable cursor for reading (bounds-checked, zero-copy).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_bytes(1)?[0] as i8)
    }

    impl_read!(read_u16, u16, 2);
    impl_read!(read_i16, i16, 2);
    impl_read!(read_u32, u32, 4);
    impl_read!(read_i32, i32, 4);
    impl_read!(read_u64, u64, 8);

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(PackError::ShortBuffer {
                offset: self.offset,
                need: len,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    impl_cursor_common!();

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
