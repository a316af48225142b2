// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema construction, encoding and decoding.

use std::fmt;

/// Result type for bufpack operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors surfaced by codecs, the registry and schemas.
///
/// Every failure propagates to the immediate caller; nothing is retried or
/// recovered internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Integer outside the range the codec can represent.
    Range { value: i64, min: i64, max: i64 },
    /// Input ended before a field could be read.
    ShortBuffer {
        offset: usize,
        need: usize,
        have: usize,
    },
    /// Input bytes are not a valid encoding for the codec.
    Malformed { offset: usize, reason: String },
    /// Destination too small, or the value cannot be laid out as declared.
    Encoding { offset: usize, reason: String },
    /// Value length differs from the length the field declares.
    LengthMismatch { expected: usize, found: usize },
    /// Value variant does not fit the codec.
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    /// Field value absent and no default declared.
    MissingValue(String),
    /// Field name declared twice in one schema.
    DuplicateField(String),
    /// Type name not present in the registry.
    UnknownCodec(String),
    /// Codec factory rejected its options.
    InvalidOptions { codec: String, reason: String },
}

impl PackError {
    pub(crate) fn encoding(offset: usize, reason: impl Into<String>) -> Self {
        Self::Encoding {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_options(codec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            codec: codec.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach the field name to a codec-level missing value.
    pub(crate) fn for_field(self, name: &str) -> Self {
        match self {
            Self::MissingValue(field) if field.is_empty() => Self::MissingValue(name.to_string()),
            other => other,
        }
    }

    /// True for errors raised while building a schema rather than using it.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCodec(_) | Self::InvalidOptions { .. } | Self::DuplicateField(_)
        )
    }
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { value, min, max } => {
                write!(f, "value {} out of range [{}, {}]", value, min, max)
            }
            Self::ShortBuffer { offset, need, have } => write!(
                f,
                "short buffer at offset {}: need {} bytes, have {}",
                offset, need, have
            ),
            Self::Malformed { offset, reason } => {
                write!(f, "malformed input at offset {}: {}", offset, reason)
            }
            Self::Encoding { offset, reason } => {
                write!(f, "encoding failed at offset {}: {}", offset, reason)
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "length mismatch: expected {}, found {}", expected, found)
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::MissingValue(field) => write!(f, "missing value for field '{}'", field),
            Self::DuplicateField(name) => write!(f, "duplicate field '{}'", name),
            Self::UnknownCodec(name) => write!(f, "unknown codec '{}'", name),
            Self::InvalidOptions { codec, reason } => {
                write!(f, "invalid options for codec '{}': {}", codec, reason)
            }
        }
    }
}

impl std::error::Error for PackError {}
