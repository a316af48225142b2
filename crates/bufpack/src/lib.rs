// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # bufpack - composable binary record serialization
//!
//! Declare a [`Schema`] of named, typed fields once, then encode records
//! into exact-size byte buffers and decode them back.
//!
//! ## Quick Start
//!
//! ```rust
//! use bufpack::{Options, Record, Schema, Value};
//!
//! let schema = Schema::new()
//!     .field("id", "uint16be", Options::new())?
//!     .field("name", "str", Options::new().length(4).pad(b' '))?
//!     .field("samples", "array", Options::new().length(2).element(bufpack::codec("int8")?))?;
//!
//! let record = Record::new()
//!     .with("id", 513u16)
//!     .with("name", "abc")
//!     .with("samples", vec![Value::from(1i8), Value::from(-1i8)]);
//!
//! let bytes = schema.encode(&record)?;
//! assert_eq!(bytes, [0x02, 0x01, b'a', b'b', b'c', b' ', 0x01, 0xFF]);
//! assert_eq!(schema.decode(&bytes)?, record);
//! # Ok::<(), bufpack::PackError>(())
//! ```
//!
//! ## Building Blocks
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Codec`] | Size/write/read contract every field type implements |
//! | [`Registry`] | Name to codec (or codec factory) mapping |
//! | [`Schema`] | Ordered fields; itself a [`Codec`], so schemas nest |
//! | [`Cursor`] / [`CursorMut`] | Bounds-checked read/write position over a buffer |
//! | [`Value`] / [`Record`] | Dynamic field values and the records holding them |
//!
//! ## Built-in Codecs
//!
//! - `uint8`, `int8`, `uint16be` ... `int64le`: fixed-width integers.
//!   64-bit values are limited to `+/-(2^53 - 1)`. `uint8be`, `uint8le`,
//!   `int8be` and `int8le` alias the 8-bit codecs.
//! - `varuint`: 1, 3, 5 or 9 byte variable-length unsigned integer.
//! - `buffer`: raw bytes, fixed or record-driven length.
//! - `str`: fixed-length text with optional pad byte.
//! - `array`: fixed count of an element codec or nested schema.
//!
//! Custom codecs are registered with [`register`] and are indistinguishable
//! from built-ins.

pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod registry;
pub mod schema;
pub mod value;

pub use codec::{
    decode_value, encode_value, ArrayCodec, BytesCodec, Codec, IntCodec, IntWidth, Length,
    Options, TextCodec, TextEncoding, VarUintCodec,
};
pub use cursor::{Cursor, CursorMut, Endian};
pub use error::{PackError, Result};
pub use registry::{codec, register, CodecFactory, Registry};
pub use schema::{Field, Schema};
pub use value::{Record, Value};
