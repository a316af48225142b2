// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-count homogeneous array codec.

use super::{mismatch, require, Codec, Length, Options};
use crate::cursor::{Cursor, CursorMut};
use crate::error::{PackError, Result};
use crate::value::{Record, Value};
use std::sync::Arc;

/// N elements of one codec, laid out back to back.
///
/// The element codec may be a primitive or a [`Schema`](crate::Schema); both
/// are driven through the same cursor, so nested records continue the outer
/// offset.
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    length: usize,
    element: Arc<dyn Codec>,
}

impl ArrayCodec {
    pub fn new(length: usize, element: Arc<dyn Codec>) -> Self {
        Self { length, element }
    }

    /// Factory used by the `array` registry entry.
    pub fn from_options(options: &Options) -> Result<Self> {
        let length = match &options.length {
            Some(Length::Fixed(len)) => *len,
            Some(Length::Dynamic(_)) => {
                return Err(PackError::invalid_options(
                    "array",
                    "element count must be fixed",
                ))
            }
            None => return Err(PackError::invalid_options("array", "length is required")),
        };
        let element = options
            .element
            .clone()
            .ok_or_else(|| PackError::invalid_options("array", "element codec is required"))?;
        Ok(Self { length, element })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn element(&self) -> &Arc<dyn Codec> {
        &self.element
    }

    fn items_of<'v>(&self, value: Option<&'v Value>) -> Result<&'v [Value]> {
        let value = require(value)?;
        let items = value.as_list().ok_or_else(|| mismatch("list", value))?;
        if items.len() != self.length {
            return Err(PackError::LengthMismatch {
                expected: self.length,
                found: items.len(),
            });
        }
        Ok(items)
    }
}

impl Codec for ArrayCodec {
    fn byte_length(&self, value: Option<&Value>, record: &Record) -> Result<usize> {
        self.items_of(value)?
            .iter()
            .try_fold(0usize, |total, item| {
                Ok(total + self.element.byte_length(Some(item), record)?)
            })
    }

    fn write(
        &self,
        cursor: &mut CursorMut<'_>,
        value: Option<&Value>,
        record: &Record,
    ) -> Result<()> {
        for item in self.items_of(value)? {
            self.element.write(cursor, Some(item), record)?;
        }
        Ok(())
    }

    fn read(&self, cursor: &mut Cursor<'_>, record: &Record) -> Result<Value> {
        let mut items = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            items.push(self.element.read(cursor, record)?);
        }
        Ok(Value::List(items))
    }
}
