// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec contract and built-in codecs.
//!
//! A codec is the size/write/read behavior for one value type. Codecs hold
//! no mutable state; everything that changes during a pass lives in the
//! cursor.
//!
//! # Symmetry
//!
//! For every codec, the number of bytes consumed by [`Codec::read`] equals
//! [`Codec::byte_length`] of the value it returns, which equals the number
//! of bytes [`Codec::write`] produces for that value. Schemas rely on this to
//! size the destination exactly before writing.
//!
//! # Record accessor
//!
//! Each operation receives the record in progress: the whole (defaulted)
//! record while encoding, and the already-decoded prefix while decoding.
//! Length callbacks read sibling fields through it.

mod array;
mod bytes;
mod integer;
mod text;
mod varint;

pub use array::ArrayCodec;
pub use bytes::BytesCodec;
pub use integer::{IntCodec, IntWidth};
pub(crate) use integer::builtins as integer_builtins;
pub use text::{TextCodec, TextEncoding};
pub use varint::VarUintCodec;

use crate::cursor::{Cursor, CursorMut};
use crate::error::{PackError, Result};
use crate::value::{Record, Value};
use std::fmt;
use std::sync::Arc;

/// Size/write/read behavior for one value type.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Number of bytes `write` will produce for `value`.
    ///
    /// Must not mutate state. Validation that would make `write` fail
    /// (range, length, type) happens here so that encoding never allocates
    /// for a value it cannot finish.
    fn byte_length(&self, value: Option<&Value>, record: &Record) -> Result<usize>;

    /// Write `value` at the cursor and advance it by `byte_length(value)`.
    fn write(&self, cursor: &mut CursorMut<'_>, value: Option<&Value>, record: &Record)
        -> Result<()>;

    /// Read one value at the cursor, advancing it by the bytes consumed.
    fn read(&self, cursor: &mut Cursor<'_>, record: &Record) -> Result<Value>;
}

/// Callback resolving a length from the record in progress.
pub type LengthFn = dyn Fn(&Record) -> Result<usize> + Send + Sync;

/// Declared length of a byte range or text field.
#[derive(Clone)]
pub enum Length {
    Fixed(usize),
    /// Resolved per record, typically from an earlier length field.
    Dynamic(Arc<LengthFn>),
}

impl Length {
    /// Length read from an integer field of the same record.
    ///
    /// The field must already be decoded when the dependent field is read,
    /// i.e. declared earlier in the schema.
    pub fn from_field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::Dynamic(Arc::new(move |record: &Record| {
            let value = record
                .get(&name)
                .ok_or_else(|| PackError::MissingValue(name.clone()))?;
            let len = value.as_int().ok_or_else(|| PackError::TypeMismatch {
                expected: "int",
                found: value.kind().to_string(),
            })?;
            usize::try_from(len).map_err(|_| PackError::Range {
                value: len,
                min: 0,
                max: i64::MAX,
            })
        }))
    }

    /// Resolve against the record in progress.
    pub fn resolve(&self, record: &Record) -> Result<usize> {
        match self {
            Self::Fixed(len) => Ok(*len),
            Self::Dynamic(f) => f(record),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(len) => write!(f, "Fixed({})", len),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Self::Fixed(len)
    }
}

/// Per-field options handed to codec factories at declaration time.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Byte count (`buffer`, `str`) or element count (`array`).
    pub length: Option<Length>,
    /// Text encoding for `str`.
    pub encoding: Option<TextEncoding>,
    /// Pad byte filling short `str` values.
    pub pad: Option<u8>,
    /// Value substituted when the field is absent on encode.
    pub default: Option<Value>,
    /// Element codec for `array`; schemas qualify.
    pub element: Option<Arc<dyn Codec>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(Length::Fixed(length));
        self
    }

    /// Length computed from the record in progress.
    #[must_use]
    pub fn dynamic_length<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Result<usize> + Send + Sync + 'static,
    {
        self.length = Some(Length::Dynamic(Arc::new(f)));
        self
    }

    /// Length taken from an earlier integer field.
    #[must_use]
    pub fn length_from(mut self, field: impl Into<String>) -> Self {
        self.length = Some(Length::from_field(field));
        self
    }

    #[must_use]
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    #[must_use]
    pub fn pad(mut self, pad: u8) -> Self {
        self.pad = Some(pad);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn element(mut self, codec: Arc<dyn Codec>) -> Self {
        self.element = Some(codec);
        self
    }
}

/// Encode a single value with a standalone codec.
pub fn encode_value(codec: &dyn Codec, value: &Value) -> Result<Vec<u8>> {
    let context = Record::new();
    let len = codec.byte_length(Some(value), &context)?;
    let mut buffer = zeroed(len)?;
    let mut cursor = CursorMut::new(&mut buffer);
    codec.write(&mut cursor, Some(value), &context)?;
    Ok(buffer)
}

/// Decode a single value with a standalone codec.
pub fn decode_value(codec: &dyn Codec, bytes: &[u8]) -> Result<Value> {
    let mut cursor = Cursor::new(bytes);
    codec.read(&mut cursor, &Record::new())
}

/// Zero-filled buffer of `len` bytes; allocation failure is an error.
///
/// Lengths can come from record fields, so they are not trusted to fit in
/// memory.
pub(crate) fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        PackError::encoding(0, format!("cannot allocate {} bytes: {}", len, e))
    })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

pub(crate) fn require(value: Option<&Value>) -> Result<&Value> {
    value.ok_or_else(|| PackError::MissingValue(String::new()))
}

pub(crate) fn mismatch(expected: &'static str, found: &Value) -> PackError {
    PackError::TypeMismatch {
        expected,
        found: found.kind().to_string(),
    }
}
