// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width integer codecs.
//!
//! 8/16/32/64-bit, signed or unsigned, big or little endian. 8-bit codecs
//! ignore endianness. 64-bit values are limited to the safe-integer domain
//! (see [`MAX_SAFE_INTEGER`]) and travel as a high and a low 32-bit word
//! ordered by endianness.

use super::{mismatch, require, Codec};
use crate::config::{MAX_SAFE_INTEGER, WORD_SPLIT};
use crate::cursor::{Cursor, CursorMut, Endian};
use crate::error::{PackError, Result};
use crate::value::{Record, Value};

/// Integer width in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub const fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }
}

/// Fixed-width integer codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntCodec {
    width: IntWidth,
    signed: bool,
    endian: Endian,
}

impl IntCodec {
    pub const U8: Self = Self::new(IntWidth::W8, false, Endian::Big);
    pub const I8: Self = Self::new(IntWidth::W8, true, Endian::Big);
    pub const U16_LE: Self = Self::new(IntWidth::W16, false, Endian::Little);
    pub const U32_LE: Self = Self::new(IntWidth::W32, false, Endian::Little);
    pub const U64_LE: Self = Self::new(IntWidth::W64, false, Endian::Little);

    pub const fn new(width: IntWidth, signed: bool, endian: Endian) -> Self {
        Self {
            width,
            signed,
            endian,
        }
    }

    pub const fn width(&self) -> IntWidth {
        self.width
    }

    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Inclusive range of encodable values.
    pub const fn bounds(&self) -> (i64, i64) {
        match (self.width, self.signed) {
            (IntWidth::W8, false) => (0, u8::MAX as i64),
            (IntWidth::W8, true) => (i8::MIN as i64, i8::MAX as i64),
            (IntWidth::W16, false) => (0, u16::MAX as i64),
            (IntWidth::W16, true) => (i16::MIN as i64, i16::MAX as i64),
            (IntWidth::W32, false) => (0, u32::MAX as i64),
            (IntWidth::W32, true) => (i32::MIN as i64, i32::MAX as i64),
            (IntWidth::W64, false) => (0, MAX_SAFE_INTEGER),
            (IntWidth::W64, true) => (-MAX_SAFE_INTEGER, MAX_SAFE_INTEGER),
        }
    }

    /// Range check ahead of any write.
    pub fn check(&self, value: i64) -> Result<()> {
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(PackError::Range { value, min, max });
        }
        Ok(())
    }

    /// Write a raw integer.
    pub fn write_int(&self, cursor: &mut CursorMut<'_>, value: i64) -> Result<()> {
        self.check(value)?;
        match (self.width, self.signed) {
            (IntWidth::W8, false) => cursor.write_u8(value as u8),
            (IntWidth::W8, true) => cursor.write_i8(value as i8),
            (IntWidth::W16, false) => cursor.write_u16(value as u16, self.endian),
            (IntWidth::W16, true) => cursor.write_i16(value as i16, self.endian),
            (IntWidth::W32, false) => cursor.write_u32(value as u32, self.endian),
            (IntWidth::W32, true) => cursor.write_i32(value as i32, self.endian),
            (IntWidth::W64, _) => self.write_split(cursor, value),
        }
    }

    /// Read a raw integer.
    pub fn read_int(&self, cursor: &mut Cursor<'_>) -> Result<i64> {
        let value = match (self.width, self.signed) {
            (IntWidth::W8, false) => i64::from(cursor.read_u8()?),
            (IntWidth::W8, true) => i64::from(cursor.read_i8()?),
            (IntWidth::W16, false) => i64::from(cursor.read_u16(self.endian)?),
            (IntWidth::W16, true) => i64::from(cursor.read_i16(self.endian)?),
            (IntWidth::W32, false) => i64::from(cursor.read_u32(self.endian)?),
            (IntWidth::W32, true) => i64::from(cursor.read_i32(self.endian)?),
            (IntWidth::W64, _) => self.read_split(cursor)?,
        };
        Ok(value)
    }

    // High word carries the sign (floor division), low word is always
    // unsigned. Big endian puts the high word first.
    fn write_split(&self, cursor: &mut CursorMut<'_>, value: i64) -> Result<()> {
        let high = value.div_euclid(WORD_SPLIT);
        let low = value.rem_euclid(WORD_SPLIT) as u32;
        match self.endian {
            Endian::Big => {
                self.write_high(cursor, high)?;
                cursor.write_u32(low, self.endian)
            }
            Endian::Little => {
                cursor.write_u32(low, self.endian)?;
                self.write_high(cursor, high)
            }
        }
    }

    fn write_high(&self, cursor: &mut CursorMut<'_>, high: i64) -> Result<()> {
        if self.signed {
            cursor.write_i32(high as i32, self.endian)
        } else {
            cursor.write_u32(high as u32, self.endian)
        }
    }

    fn read_split(&self, cursor: &mut Cursor<'_>) -> Result<i64> {
        let (high, low) = match self.endian {
            Endian::Big => {
                let high = self.read_high(cursor)?;
                (high, cursor.read_u32(self.endian)?)
            }
            Endian::Little => {
                let low = cursor.read_u32(self.endian)?;
                (self.read_high(cursor)?, low)
            }
        };
        // Unsigned high words reach 2^32 - 1; saturate and let the range
        // check reject anything past the safe domain.
        let value = high
            .saturating_mul(WORD_SPLIT)
            .saturating_add(i64::from(low));
        self.check(value)?;
        Ok(value)
    }

    fn read_high(&self, cursor: &mut Cursor<'_>) -> Result<i64> {
        if self.signed {
            Ok(i64::from(cursor.read_i32(self.endian)?))
        } else {
            Ok(i64::from(cursor.read_u32(self.endian)?))
        }
    }

    fn value_of(&self, value: Option<&Value>) -> Result<i64> {
        let value = require(value)?;
        let int = value.as_int().ok_or_else(|| mismatch("int", value))?;
        self.check(int)?;
        Ok(int)
    }
}

impl Codec for IntCodec {
    fn byte_length(&self, value: Option<&Value>, _record: &Record) -> Result<usize> {
        self.value_of(value)?;
        Ok(self.width.bytes())
    }

    fn write(
        &self,
        cursor: &mut CursorMut<'_>,
        value: Option<&Value>,
        _record: &Record,
    ) -> Result<()> {
        let int = self.value_of(value)?;
        self.write_int(cursor, int)
    }

    fn read(&self, cursor: &mut Cursor<'_>, _record: &Record) -> Result<Value> {
        Ok(Value::Int(self.read_int(cursor)?))
    }
}

/// Registry names of the built-in integer codecs.
///
/// The suffixed 8-bit names are aliases; a single byte has no byte order.
pub(crate) fn builtins() -> Vec<(&'static str, IntCodec)> {
    use Endian::{Big, Little};
    use IntWidth::{W16, W32, W64};
    vec![
        ("uint8", IntCodec::U8),
        ("int8", IntCodec::I8),
        ("uint8be", IntCodec::U8),
        ("uint8le", IntCodec::U8),
        ("int8be", IntCodec::I8),
        ("int8le", IntCodec::I8),
        ("uint16be", IntCodec::new(W16, false, Big)),
        ("uint16le", IntCodec::new(W16, false, Little)),
        ("int16be", IntCodec::new(W16, true, Big)),
        ("int16le", IntCodec::new(W16, true, Little)),
        ("uint32be", IntCodec::new(W32, false, Big)),
        ("uint32le", IntCodec::new(W32, false, Little)),
        ("int32be", IntCodec::new(W32, true, Big)),
        ("int32le", IntCodec::new(W32, true, Little)),
        ("uint64be", IntCodec::new(W64, false, Big)),
        ("uint64le", IntCodec::new(W64, false, Little)),
        ("int64be", IntCodec::new(W64, true, Big)),
        ("int64le", IntCodec::new(W64, true, Little)),
    ]
}
