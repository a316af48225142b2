// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw byte range codec.

use super::{mismatch, require, Codec, Length, Options};
use crate::cursor::{Cursor, CursorMut};
use crate::error::{PackError, Result};
use crate::value::{Record, Value};

/// Raw bytes of a fixed or record-derived length.
///
/// A value whose length differs from the resolved length is rejected during
/// the size pass rather than truncated or zero-extended.
#[derive(Debug, Clone)]
pub struct BytesCodec {
    length: Length,
}

impl BytesCodec {
    pub fn new(length: impl Into<Length>) -> Self {
        Self {
            length: length.into(),
        }
    }

    /// Factory used by the `buffer` registry entry.
    pub fn from_options(options: &Options) -> Result<Self> {
        let length = options
            .length
            .clone()
            .ok_or_else(|| PackError::invalid_options("buffer", "length is required"))?;
        Ok(Self { length })
    }

    pub fn length(&self) -> &Length {
        &self.length
    }

    fn bytes_of<'v>(&self, value: Option<&'v Value>, record: &Record) -> Result<&'v [u8]> {
        let value = require(value)?;
        let bytes = value.as_bytes().ok_or_else(|| mismatch("bytes", value))?;
        let expected = self.length.resolve(record)?;
        if bytes.len() != expected {
            return Err(PackError::LengthMismatch {
                expected,
                found: bytes.len(),
            });
        }
        Ok(bytes)
    }
}

impl Codec for BytesCodec {
    fn byte_length(&self, value: Option<&Value>, record: &Record) -> Result<usize> {
        Ok(self.bytes_of(value, record)?.len())
    }

    fn write(
        &self,
        cursor: &mut CursorMut<'_>,
        value: Option<&Value>,
        record: &Record,
    ) -> Result<()> {
        let bytes = self.bytes_of(value, record)?;
        cursor.write_bytes(bytes)
    }

    fn read(&self, cursor: &mut Cursor<'_>, record: &Record) -> Result<Value> {
        let len = self.length.resolve(record)?;
        Ok(Value::Bytes(cursor.read_bytes(len)?.to_vec()))
    }
}
