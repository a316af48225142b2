// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-length text codec.
//!
//! Text is encoded into exactly N bytes. Longer text is truncated on a
//! character boundary; shorter text is followed by the pad unit when a pad
//! is declared, or by untouched (zeroed) bytes otherwise. Decoding strips
//! trailing pad units only when a pad is declared.

use super::{mismatch, require, Codec, Length, Options};
use crate::config::DEFAULT_TEXT_ENCODING;
use crate::cursor::{Cursor, CursorMut};
use crate::error::{PackError, Result};
use crate::value::{Record, Value};

/// Character encodings supported by `str` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    /// 7-bit; encoding keeps the low byte of each character.
    Ascii,
    /// ISO-8859-1; encoding keeps the low byte of each character.
    Latin1,
    Utf16Le,
}

impl TextEncoding {
    /// Encode at most `limit` bytes without splitting a character.
    fn encode(self, text: &str, limit: usize) -> Vec<u8> {
        match self {
            Self::Utf8 => {
                let mut end = text.len().min(limit);
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                text.as_bytes()[..end].to_vec()
            }
            Self::Ascii | Self::Latin1 => text
                .chars()
                .take(limit)
                .map(|c| (u32::from(c) & 0xFF) as u8)
                .collect(),
            Self::Utf16Le => {
                let mut units: Vec<u16> = text.encode_utf16().take(limit / 2).collect();
                if units
                    .last()
                    .is_some_and(|u| (0xD800..0xDC00).contains(u))
                {
                    units.pop();
                }
                units.iter().flat_map(|u| u.to_le_bytes()).collect()
            }
        }
    }

    fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Ascii => bytes.iter().map(|b| char::from(b & 0x7F)).collect(),
            Self::Latin1 => bytes.iter().map(|b| char::from(*b)).collect(),
            Self::Utf16Le => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }

    /// Byte pattern of one pad character.
    fn pad_unit(self, pad: u8) -> Vec<u8> {
        match self {
            Self::Utf16Le => vec![pad, 0],
            _ => vec![pad],
        }
    }
}

/// Text stored in a fixed number of bytes.
#[derive(Debug, Clone)]
pub struct TextCodec {
    length: Length,
    encoding: TextEncoding,
    pad: Option<u8>,
}

impl TextCodec {
    pub fn new(length: impl Into<Length>) -> Self {
        Self {
            length: length.into(),
            encoding: DEFAULT_TEXT_ENCODING,
            pad: None,
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_pad(mut self, pad: u8) -> Self {
        self.pad = Some(pad);
        self
    }

    /// Factory used by the `str` registry entry.
    pub fn from_options(options: &Options) -> Result<Self> {
        let length = options
            .length
            .clone()
            .ok_or_else(|| PackError::invalid_options("str", "length is required"))?;
        Ok(Self {
            length,
            encoding: options.encoding.unwrap_or(DEFAULT_TEXT_ENCODING),
            pad: options.pad,
        })
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    fn text_of(value: Option<&Value>) -> Result<&str> {
        let value = require(value)?;
        value.as_text().ok_or_else(|| mismatch("text", value))
    }

    fn strip_pad<'b>(&self, mut bytes: &'b [u8]) -> &'b [u8] {
        let Some(pad) = self.pad else {
            return bytes;
        };
        let unit = self.encoding.pad_unit(pad);
        // A trailing partial unit is padding too.
        let partial = bytes.len() % unit.len();
        if partial != 0 && bytes[bytes.len() - partial..] == unit[..partial] {
            bytes = &bytes[..bytes.len() - partial];
        }
        while bytes.ends_with(&unit) {
            bytes = &bytes[..bytes.len() - unit.len()];
        }
        bytes
    }
}

impl Codec for TextCodec {
    fn byte_length(&self, value: Option<&Value>, record: &Record) -> Result<usize> {
        Self::text_of(value)?;
        self.length.resolve(record)
    }

    fn write(
        &self,
        cursor: &mut CursorMut<'_>,
        value: Option<&Value>,
        record: &Record,
    ) -> Result<()> {
        let text = Self::text_of(value)?;
        let len = self.length.resolve(record)?;
        let encoded = self.encoding.encode(text, len);
        cursor.write_bytes(&encoded)?;

        let rest = len - encoded.len();
        match self.pad {
            Some(pad) => {
                let unit = self.encoding.pad_unit(pad);
                let filler: Vec<u8> = unit.iter().copied().cycle().take(rest).collect();
                cursor.write_bytes(&filler)
            }
            None => cursor.skip(rest),
        }
    }

    fn read(&self, cursor: &mut Cursor<'_>, record: &Record) -> Result<Value> {
        let len = self.length.resolve(record)?;
        let bytes = cursor.read_bytes(len)?;
        Ok(Value::Text(self.encoding.decode(self.strip_pad(bytes))))
    }
}
