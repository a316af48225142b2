// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! bufpack constants - single source of truth.
//!
//! Wire-format markers and numeric bounds live here. **Never hardcode them
//! in codec modules.**
//!
//! Per-field configuration is not global: it is the [`Options`](crate::Options)
//! value passed when a field is declared.

use crate::codec::TextEncoding;

// =======================================================================
// Integer domain
// =======================================================================

/// Largest integer magnitude exactly representable in an IEEE-754 double
/// (2^53 - 1).
///
/// 64-bit codecs refuse values beyond `[-MAX_SAFE_INTEGER, MAX_SAFE_INTEGER]`
/// so that encoded data stays interchangeable with float-based peers.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Word size used when splitting 64-bit values into high/low halves.
pub const WORD_SPLIT: i64 = 1 << 32;

// =======================================================================
// Variable-length unsigned integer markers
// =======================================================================

/// Values strictly below this marker are stored in a single byte.
pub const VARINT_MARKER_U16: u8 = 0xFD;

/// Marker followed by a little-endian 32-bit value.
pub const VARINT_MARKER_U32: u8 = 0xFE;

/// Marker followed by a little-endian 64-bit value.
pub const VARINT_MARKER_U64: u8 = 0xFF;

// =======================================================================
// Text
// =======================================================================

/// Encoding used by `str` fields that do not declare one.
pub const DEFAULT_TEXT_ENCODING: TextEncoding = TextEncoding::Utf8;
