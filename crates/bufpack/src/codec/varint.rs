// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variable-length unsigned integer codec.
//!
//! | Value Range              | Bytes | Format                     |
//! |--------------------------|-------|----------------------------|
//! | 0 - 0xFC                 | 1     | `[value]`                  |
//! | 0xFD - 0xFFFF            | 3     | `[0xFD, u16 little-endian]`|
//! | 0x1_0000 - 0xFFFF_FFFF   | 5     | `[0xFE, u32 little-endian]`|
//! | 0x1_0000_0000 - 2^53 - 1 | 9     | `[0xFF, u64 little-endian]`|
//!
//! The 9-byte form goes through the 64-bit codec and inherits its
//! safe-integer limit. Decoding accepts only the shortest form, so every
//! decoded value re-encodes to the bytes it was read from.

use super::{mismatch, require, Codec, IntCodec};
use crate::config::{VARINT_MARKER_U16, VARINT_MARKER_U32, VARINT_MARKER_U64};
use crate::cursor::{Cursor, CursorMut};
use crate::error::{PackError, Result};
use crate::value::{Record, Value};

/// Marker-prefixed unsigned integer (1, 3, 5 or 9 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VarUintCodec;

impl VarUintCodec {
    /// Encoded size and payload codec for `value`.
    fn layout(value: i64) -> Result<(usize, Option<(u8, IntCodec)>)> {
        IntCodec::U64_LE.check(value)?;
        Ok(if value < i64::from(VARINT_MARKER_U16) {
            (1, None)
        } else if value <= i64::from(u16::MAX) {
            (3, Some((VARINT_MARKER_U16, IntCodec::U16_LE)))
        } else if value <= i64::from(u32::MAX) {
            (5, Some((VARINT_MARKER_U32, IntCodec::U32_LE)))
        } else {
            (9, Some((VARINT_MARKER_U64, IntCodec::U64_LE)))
        })
    }

    fn value_of(value: Option<&Value>) -> Result<i64> {
        let value = require(value)?;
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl Codec for VarUintCodec {
    fn byte_length(&self, value: Option<&Value>, _record: &Record) -> Result<usize> {
        let (len, _) = Self::layout(Self::value_of(value)?)?;
        Ok(len)
    }

    fn write(
        &self,
        cursor: &mut CursorMut<'_>,
        value: Option<&Value>,
        _record: &Record,
    ) -> Result<()> {
        let value = Self::value_of(value)?;
        match Self::layout(value)? {
            (_, None) => IntCodec::U8.write_int(cursor, value),
            (_, Some((marker, payload))) => {
                cursor.write_u8(marker)?;
                payload.write_int(cursor, value)
            }
        }
    }

    fn read(&self, cursor: &mut Cursor<'_>, _record: &Record) -> Result<Value> {
        let offset = cursor.offset();
        let (value, min) = match cursor.read_u8()? {
            VARINT_MARKER_U16 => (
                IntCodec::U16_LE.read_int(cursor)?,
                i64::from(VARINT_MARKER_U16),
            ),
            VARINT_MARKER_U32 => (
                IntCodec::U32_LE.read_int(cursor)?,
                i64::from(u16::MAX) + 1,
            ),
            VARINT_MARKER_U64 => (
                IntCodec::U64_LE.read_int(cursor)?,
                i64::from(u32::MAX) + 1,
            ),
            small => return Ok(Value::Int(i64::from(small))),
        };
        if value < min {
            return Err(PackError::malformed(
                offset,
                format!("non-canonical varuint: {} fits a shorter form", value),
            ));
        }
        Ok(Value::Int(value))
    }
}
