// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record schemas: ordered, named, typed fields.
//!
//! A [`Schema`] is a reusable template. Declaration order is wire order and
//! the evaluation order of length callbacks, so a length field must be
//! declared before the field whose length it carries.
//!
//! A schema is itself a [`Codec`]: it can be a field type or an array
//! element, and it then reads and writes through the caller's cursor.
//!
//! # Example
//!
//! ```rust
//! use bufpack::{Options, Record, Schema};
//!
//! let schema = Schema::new()
//!     .field("len", "uint8", Options::new())?
//!     .field("data", "buffer", Options::new().length_from("len"))?;
//!
//! let record = Record::new().with("len", 2u8).with("data", vec![0xAAu8, 0xBB]);
//! let bytes = schema.encode(&record)?;
//! assert_eq!(bytes, [0x02, 0xAA, 0xBB]);
//! assert_eq!(schema.decode(&bytes)?, record);
//! # Ok::<(), bufpack::PackError>(())
//! ```

use crate::codec::{mismatch, zeroed, Codec, Options};
use crate::cursor::{Cursor, CursorMut};
use crate::error::{PackError, Result};
use crate::registry::Registry;
use crate::value::{Record, Value};
use std::borrow::Cow;
use std::sync::Arc;

/// One named slot of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    codec: Arc<dyn Codec>,
    default: Option<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, codec: Arc<dyn Codec>) -> Self {
        Self {
            name: name.into(),
            codec,
            default: None,
        }
    }

    /// Value encoded when the record lacks this field.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Ordered sequence of fields with size/encode/decode over records.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field whose codec comes from the global registry.
    pub fn field(self, name: impl Into<String>, type_name: &str, options: Options) -> Result<Self> {
        self.field_in(Registry::global(), name, type_name, options)
    }

    /// Add a field whose codec comes from `registry`.
    pub fn field_in(
        self,
        registry: &Registry,
        name: impl Into<String>,
        type_name: &str,
        options: Options,
    ) -> Result<Self> {
        let codec = registry.resolve(type_name, &options)?;
        self.field_codec(name, codec, options)
    }

    /// Add a field with a literal codec instance.
    pub fn field_codec(
        mut self,
        name: impl Into<String>,
        codec: Arc<dyn Codec>,
        options: Options,
    ) -> Result<Self> {
        let mut field = Field::new(name, codec);
        field.default = options.default;
        self.push_field(field)?;
        Ok(self)
    }

    /// Add a nested record field.
    pub fn field_schema(
        self,
        name: impl Into<String>,
        schema: Schema,
        options: Options,
    ) -> Result<Self> {
        self.field_codec(name, Arc::new(schema), options)
    }

    /// Append a field in place.
    pub fn push_field(&mut self, field: Field) -> Result<()> {
        if self.get_field(&field.name).is_some() {
            return Err(PackError::DuplicateField(field.name));
        }
        log::trace!(
            "[Schema] field #{} '{}' -> {:?}",
            self.fields.len(),
            field.name,
            field.codec
        );
        self.fields.push(field);
        Ok(())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Exact encoded size of `record`.
    ///
    /// Performs every validation that encoding would, so range and length
    /// errors surface here before anything is allocated.
    pub fn size(&self, record: &Record) -> Result<usize> {
        let record = self.with_defaults(record);
        self.fields.iter().try_fold(0usize, |total, field| {
            let len = field
                .codec
                .byte_length(record.get(&field.name), &record)
                .map_err(|e| e.for_field(&field.name))?;
            Ok(total + len)
        })
    }

    /// Encode `record` into a freshly allocated buffer of exactly `size` bytes.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let size = self.size(record)?;
        let mut buffer = zeroed(size)?;
        let mut cursor = CursorMut::new(&mut buffer);
        self.encode_with(&mut cursor, record)?;
        if cursor.offset() != size {
            return Err(PackError::encoding(
                cursor.offset(),
                format!("codecs wrote {} bytes, size pass computed {}", cursor.offset(), size),
            ));
        }
        log::trace!("[Schema] encoded {} fields into {} bytes", self.len(), size);
        Ok(buffer)
    }

    /// Encode `record` at the start of `buffer`, returning the bytes written.
    ///
    /// The size pass runs first, so a too-small buffer is reported before
    /// anything is written.
    pub fn encode_into(&self, record: &Record, buffer: &mut [u8]) -> Result<usize> {
        let size = self.size(record)?;
        if size > buffer.len() {
            return Err(PackError::encoding(
                0,
                format!(
                    "buffer too small: need {} bytes, have {}",
                    size,
                    buffer.len()
                ),
            ));
        }
        let mut cursor = CursorMut::new(buffer);
        self.encode_with(&mut cursor, record)?;
        Ok(cursor.offset())
    }

    /// Write every field at the cursor, continuing its offset.
    pub fn encode_with(&self, cursor: &mut CursorMut<'_>, record: &Record) -> Result<()> {
        let record = self.with_defaults(record);
        for field in &self.fields {
            field
                .codec
                .write(cursor, record.get(&field.name), &record)
                .map_err(|e| e.for_field(&field.name))?;
        }
        Ok(())
    }

    /// Decode a record from the start of `bytes`; trailing bytes are ignored.
    pub fn decode(&self, bytes: &[u8]) -> Result<Record> {
        self.decode_prefix(bytes).map(|(record, _)| record)
    }

    /// Decode a record and report how many bytes it occupied.
    pub fn decode_prefix(&self, bytes: &[u8]) -> Result<(Record, usize)> {
        let mut cursor = Cursor::new(bytes);
        let record = self.decode_with(&mut cursor)?;
        log::trace!(
            "[Schema] decoded {} fields from {} of {} bytes",
            self.len(),
            cursor.offset(),
            bytes.len()
        );
        Ok((record, cursor.offset()))
    }

    /// Read every field at the cursor, continuing its offset.
    ///
    /// Each codec sees the fields decoded so far. Defaults are never applied.
    pub fn decode_with(&self, cursor: &mut Cursor<'_>) -> Result<Record> {
        let mut record = Record::new();
        for field in &self.fields {
            let value = field
                .codec
                .read(cursor, &record)
                .map_err(|e| e.for_field(&field.name))?;
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }

    // Only a missing key takes the default; zero and other falsy values do not.
    fn with_defaults<'r>(&self, record: &'r Record) -> Cow<'r, Record> {
        let missing = |f: &Field| f.default.is_some() && !record.contains(&f.name);
        if !self.fields.iter().any(missing) {
            return Cow::Borrowed(record);
        }
        let mut filled = record.clone();
        for field in self.fields.iter().filter(|f| missing(f)) {
            if let Some(default) = &field.default {
                filled.insert(field.name.clone(), default.clone());
            }
        }
        Cow::Owned(filled)
    }
}

impl Codec for Schema {
    fn byte_length(&self, value: Option<&Value>, _record: &Record) -> Result<usize> {
        match value {
            None => self.size(&Record::new()),
            Some(Value::Record(record)) => self.size(record),
            Some(other) => Err(mismatch("record", other)),
        }
    }

    fn write(
        &self,
        cursor: &mut CursorMut<'_>,
        value: Option<&Value>,
        _record: &Record,
    ) -> Result<()> {
        match value {
            None => self.encode_with(cursor, &Record::new()),
            Some(Value::Record(record)) => self.encode_with(cursor, record),
            Some(other) => Err(mismatch("record", other)),
        }
    }

    fn read(&self, cursor: &mut Cursor<'_>, _record: &Record) -> Result<Value> {
        Ok(Value::Record(self.decode_with(cursor)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{IntCodec, TextEncoding};

    fn opts() -> Options {
        Options::new()
    }

    #[test]
    fn test_chained_declaration() {
        let schema = Schema::new()
            .field("a", "uint8", opts())
            .and_then(|s| s.field("b", "uint16be", opts()))
            .and_then(|s| s.field("c", "str", opts().length(2)))
            .expect("schema");

        let names: Vec<&str> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_unknown_codec_fails_at_build_time() {
        let err = Schema::new()
            .field("x", "float128", opts())
            .expect_err("unknown");
        assert_eq!(err, PackError::UnknownCodec("float128".into()));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Schema::new()
            .field("x", "uint8", opts())
            .and_then(|s| s.field("x", "uint16le", opts()))
            .expect_err("duplicate");
        assert_eq!(err, PackError::DuplicateField("x".into()));
    }

    #[test]
    fn test_private_registry() {
        let registry = Registry::new();
        registry.register_codec("byte", IntCodec::U8);

        let schema = Schema::new()
            .field_in(&registry, "b", "byte", opts())
            .expect("schema");
        let bytes = schema
            .encode(&Record::new().with("b", 7u8))
            .expect("encode");
        assert_eq!(bytes, [7]);

        let err = Schema::new()
            .field_in(&registry, "c", "uint8", opts())
            .expect_err("not in private registry");
        assert_eq!(err, PackError::UnknownCodec("uint8".into()));
    }

    #[test]
    fn test_defaults_only_for_absent_keys() {
        let schema = Schema::new()
            .field("foo", "uint8", opts().default_value(0xCCu8))
            .and_then(|s| s.field("bar", "uint8", opts().default_value(0xFFu8)))
            .expect("schema");

        assert_eq!(schema.encode(&Record::new()).expect("empty"), [0xCC, 0xFF]);

        let zero = Record::new().with("foo", 0u8);
        assert_eq!(schema.encode(&zero).expect("zero"), [0x00, 0xFF]);

        let decoded = schema.decode(&[0xAB, 0xCD]).expect("decode");
        assert_eq!(decoded, Record::new().with("foo", 0xABu8).with("bar", 0xCDu8));
    }

    #[test]
    fn test_missing_value_names_field() {
        let schema = Schema::new()
            .field("foo", "uint8", opts())
            .expect("schema");
        let err = schema.size(&Record::new()).expect_err("missing");
        assert_eq!(err, PackError::MissingValue("foo".into()));
    }

    #[test]
    fn test_range_error_before_allocation() {
        let schema = Schema::new()
            .field("a", "uint8", opts())
            .and_then(|s| s.field("b", "uint64be", opts()))
            .expect("schema");
        let record = Record::new().with("a", 1u8).with("b", 1i64 << 53);

        assert!(matches!(schema.size(&record), Err(PackError::Range { .. })));

        let mut buffer = [0xEEu8; 16];
        let err = schema.encode_into(&record, &mut buffer).expect_err("range");
        assert!(matches!(err, PackError::Range { .. }));
        assert_eq!(buffer, [0xEE; 16], "nothing may be written");
    }

    #[test]
    fn test_unallocatable_size_is_error() {
        let schema = Schema::new()
            .field("n", "uint64le", opts())
            .and_then(|s| s.field("name", "str", opts().length_from("n")))
            .expect("schema");
        let record = Record::new()
            .with("n", crate::config::MAX_SAFE_INTEGER)
            .with("name", "x");

        let size = schema.size(&record).expect("size");
        assert_eq!(size, 8 + crate::config::MAX_SAFE_INTEGER as usize);

        let err = schema.encode(&record).expect_err("8 PiB");
        assert!(matches!(err, PackError::Encoding { offset: 0, .. }), "{}", err);
    }

    #[test]
    fn test_encode_into_and_decode_prefix() {
        let schema = Schema::new()
            .field("a", "uint16le", opts())
            .and_then(|s| s.field("b", "str", opts().length(3).pad(b' ')))
            .expect("schema");
        let record = Record::new().with("a", 258u16).with("b", "hi");

        let mut small = [0u8; 4];
        let err = schema.encode_into(&record, &mut small).expect_err("small");
        assert!(matches!(err, PackError::Encoding { .. }));

        let mut buffer = [0u8; 8];
        let written = schema.encode_into(&record, &mut buffer).expect("encode");
        assert_eq!(written, 5);
        assert_eq!(&buffer[..5], &[0x02, 0x01, b'h', b'i', b' ']);

        let (decoded, consumed) = schema.decode_prefix(&buffer).expect("decode");
        assert_eq!(consumed, 5);
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_short_buffer_returns_no_partial_record() {
        let schema = Schema::new()
            .field("a", "uint8", opts())
            .and_then(|s| s.field("b", "uint32be", opts()))
            .expect("schema");
        let err = schema.decode(&[1, 2, 3]).expect_err("short");
        assert_eq!(
            err,
            PackError::ShortBuffer {
                offset: 1,
                need: 4,
                have: 2
            }
        );
    }

    #[test]
    fn test_nested_schema_field_defaults() {
        let header = Schema::new()
            .field("version", "uint8", opts().default_value(2u8))
            .and_then(|s| s.field("kind", "str", opts().length(4).encoding(TextEncoding::Ascii)))
            .expect("header");
        let packet = Schema::new()
            .field_schema("header", header, opts())
            .and_then(|s| s.field("body", "uint16be", opts()))
            .expect("packet");

        let record = Record::new()
            .with("header", Record::new().with("kind", "ping"))
            .with("body", 1u16);
        let bytes = packet.encode(&record).expect("encode");
        assert_eq!(bytes, [2, b'p', b'i', b'n', b'g', 0, 1]);

        let decoded = packet.decode(&bytes).expect("decode");
        let header = decoded.get("header").and_then(Value::as_record).expect("header");
        assert_eq!(header.get_int("version"), Some(2));
    }

    #[derive(Debug)]
    struct LyingCodec;

    impl Codec for LyingCodec {
        fn byte_length(&self, _value: Option<&Value>, _record: &Record) -> Result<usize> {
            Ok(2)
        }

        fn write(
            &self,
            cursor: &mut CursorMut<'_>,
            _value: Option<&Value>,
            _record: &Record,
        ) -> Result<()> {
            cursor.write_u8(0)
        }

        fn read(&self, cursor: &mut Cursor<'_>, _record: &Record) -> Result<Value> {
            Ok(Value::Int(i64::from(cursor.read_u8()?)))
        }
    }

    #[test]
    fn test_asymmetric_codec_detected() {
        let schema = Schema::new()
            .field_codec("x", Arc::new(LyingCodec), opts())
            .expect("schema");
        let err = schema.encode(&Record::new()).expect_err("asymmetric");
        assert!(matches!(err, PackError::Encoding { offset: 1, .. }));
    }
}
