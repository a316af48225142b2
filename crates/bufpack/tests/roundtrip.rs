// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Randomized round-trip and size/encode consistency over schemas that use
// every built-in codec, including nested schemas inside arrays. Decoding
// arbitrary bytes must return an error or a record whose size matches the
// bytes consumed, never panic.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use bufpack::{codec, Options, PackError, Record, Schema, TextEncoding, Value};
use std::sync::Arc;
use std::thread;

const ITERATIONS: usize = 500;
const MAX_SAFE: i64 = (1 << 53) - 1;

fn inner_schema() -> Schema {
    Schema::new()
        .field("label", "str", Options::new().length(10).pad(b' '))
        .and_then(|s| s.field("port", "uint16be", Options::new()))
        .and_then(|s| s.field("tag", "buffer", Options::new().length(4)))
        .and_then(|s| s.field("count", "varuint", Options::new()))
        .expect("inner schema")
}

fn outer_schema() -> Schema {
    let mut schema = Schema::new();
    for name in [
        "uint8", "int8", "uint16be", "uint16le", "int16be", "int16le", "uint32be", "uint32le",
        "int32be", "int32le", "uint64be", "uint64le", "int64be", "int64le", "varuint",
    ] {
        schema = schema.field(name, name, Options::new()).expect(name);
    }
    schema
        .field("len", "uint16le", Options::new())
        .and_then(|s| s.field("payload", "buffer", Options::new().length_from("len")))
        .and_then(|s| {
            s.field(
                "latin",
                "str",
                Options::new().length(6).encoding(TextEncoding::Latin1).pad(b'.'),
            )
        })
        .and_then(|s| {
            s.field(
                "items",
                "array",
                Options::new().length(2).element(Arc::new(inner_schema())),
            )
        })
        .expect("outer schema")
}

fn int_in(rng: &mut fastrand::Rng, min: i64, max: i64) -> Value {
    Value::Int(rng.i64(min..=max))
}

fn ascii(rng: &mut fastrand::Rng, max_len: usize) -> String {
    let len = rng.usize(0..=max_len);
    // Pad bytes never appear inside the content, so stripping is lossless.
    (0..len).map(|_| rng.alphanumeric()).collect()
}

fn random_item(rng: &mut fastrand::Rng) -> Value {
    let tag: Vec<u8> = (0..4).map(|_| rng.u8(..)).collect();
    Value::from(
        Record::new()
            .with("label", ascii(rng, 10))
            .with("port", int_in(rng, 0, 0xffff))
            .with("tag", tag)
            .with("count", int_in(rng, 0, MAX_SAFE)),
    )
}

fn random_record(rng: &mut fastrand::Rng) -> Record {
    let payload: Vec<u8> = (0..rng.usize(0..64)).map(|_| rng.u8(..)).collect();
    Record::new()
        .with("uint8", int_in(rng, 0, 0xff))
        .with("int8", int_in(rng, -0x80, 0x7f))
        .with("uint16be", int_in(rng, 0, 0xffff))
        .with("uint16le", int_in(rng, 0, 0xffff))
        .with("int16be", int_in(rng, -0x8000, 0x7fff))
        .with("int16le", int_in(rng, -0x8000, 0x7fff))
        .with("uint32be", int_in(rng, 0, 0xffff_ffff))
        .with("uint32le", int_in(rng, 0, 0xffff_ffff))
        .with("int32be", int_in(rng, i64::from(i32::MIN), i64::from(i32::MAX)))
        .with("int32le", int_in(rng, i64::from(i32::MIN), i64::from(i32::MAX)))
        .with("uint64be", int_in(rng, 0, MAX_SAFE))
        .with("uint64le", int_in(rng, 0, MAX_SAFE))
        .with("int64be", int_in(rng, -MAX_SAFE, MAX_SAFE))
        .with("int64le", int_in(rng, -MAX_SAFE, MAX_SAFE))
        .with("varuint", int_in(rng, 0, MAX_SAFE))
        .with("len", payload.len() as u16)
        .with("payload", payload)
        .with("latin", ascii(rng, 6))
        .with("items", vec![random_item(rng), random_item(rng)])
}

#[test]
fn test_random_records_roundtrip() {
    let schema = outer_schema();
    let mut rng = fastrand::Rng::with_seed(0x5eed_b0f);

    for _ in 0..ITERATIONS {
        let record = random_record(&mut rng);
        let size = schema.size(&record).expect("size");
        let encoded = schema.encode(&record).expect("encode");
        assert_eq!(encoded.len(), size);
        assert_eq!(schema.decode(&encoded).expect("decode"), record);
    }
}

#[test]
fn test_decode_prefix_reports_consumed_bytes() {
    let schema = outer_schema();
    let mut rng = fastrand::Rng::with_seed(7);
    let first = random_record(&mut rng);
    let second = random_record(&mut rng);

    let mut stream = schema.encode(&first).expect("first");
    let split = stream.len();
    stream.extend(schema.encode(&second).expect("second"));

    let (decoded, consumed) = schema.decode_prefix(&stream).expect("first");
    assert_eq!(consumed, split);
    assert_eq!(decoded, first);
    assert_eq!(schema.decode(&stream[consumed..]).expect("second"), second);
}

#[test]
fn test_every_truncation_is_short_buffer() {
    let schema = outer_schema();
    let mut rng = fastrand::Rng::with_seed(42);
    let encoded = schema.encode(&random_record(&mut rng)).expect("encode");

    for len in 0..encoded.len() {
        let err = schema.decode(&encoded[..len]).expect_err("truncated");
        assert!(
            matches!(err, PackError::ShortBuffer { .. }),
            "len {len}: {err}"
        );
    }
}

#[test]
fn test_shared_schema_across_threads() {
    let schema = Arc::new(outer_schema());
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let mut rng = fastrand::Rng::with_seed(seed);
                for _ in 0..50 {
                    let record = random_record(&mut rng);
                    let encoded = schema.encode(&record).expect("encode");
                    assert_eq!(schema.decode(&encoded).expect("decode"), record);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

/// Decode `bytes` and check the size/consumed law on success.
fn assert_decode_consistent(schema: &Schema, bytes: &[u8]) -> bool {
    match schema.decode_prefix(bytes) {
        Ok((record, consumed)) => {
            assert_eq!(
                schema.size(&record).expect("decoded record must size"),
                consumed,
                "input {}",
                hex::encode(bytes)
            );
            true
        }
        Err(_) => false,
    }
}

#[test]
fn test_random_bytes_decode_without_panic() {
    let schema = outer_schema();
    let mut rng = fastrand::Rng::with_seed(0xbad_5eed);

    for _ in 0..ITERATIONS * 4 {
        let len = rng.usize(0..512);
        let bytes: Vec<u8> = (0..len).map(|_| rng.u8(..)).collect();
        assert_decode_consistent(&schema, &bytes);
    }
}

#[test]
fn test_mutated_encodings_decode_consistently() {
    let schema = outer_schema();
    let mut rng = fastrand::Rng::with_seed(0x0dd_b17e);
    let mut accepted = 0usize;

    for _ in 0..ITERATIONS {
        let mut bytes = schema.encode(&random_record(&mut rng)).expect("encode");
        for _ in 0..rng.usize(1..=4) {
            let at = rng.usize(..bytes.len());
            bytes[at] = rng.u8(..);
        }
        if assert_decode_consistent(&schema, &bytes) {
            accepted += 1;
        }
    }
    // Most single-byte edits land in payload bytes and still decode.
    assert!(accepted > 0);
}

#[test]
fn test_hostile_wire_forms() {
    let schema = Schema::new()
        .field("big", "uint64be", Options::new())
        .and_then(|s| s.field("var", "varuint", Options::new()))
        .and_then(|s| {
            s.field(
                "wide",
                "str",
                Options::new().length(5).encoding(TextEncoding::Utf16Le),
            )
        })
        .expect("schema");

    let valid = "0000000000000001".to_string() + "05" + "4100420043";
    let decoded = schema
        .decode(&hex::decode(&valid).expect("hex"))
        .expect("valid");
    // Odd trailing byte of the UTF-16 field is dropped, not a panic.
    assert_eq!(decoded.get("wide").and_then(Value::as_text), Some("AB"));

    let high_word = "ffffffffffffffff".to_string() + "05" + "4100420043";
    let err = schema
        .decode(&hex::decode(&high_word).expect("hex"))
        .expect_err("high word");
    assert!(matches!(err, PackError::Range { .. }), "{err}");

    let long_varuint = "0000000000000001".to_string() + "fd0500" + "4100420043";
    let err = schema
        .decode(&hex::decode(&long_varuint).expect("hex"))
        .expect_err("non-canonical");
    assert!(matches!(err, PackError::Malformed { offset: 8, .. }), "{err}");

    for input in [&valid, &high_word, &long_varuint] {
        assert_decode_consistent(&schema, &hex::decode(input).expect("hex"));
    }
}

#[test]
fn test_varuint_through_standalone_codec() {
    let varuint = codec("varuint").expect("varuint");
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..ITERATIONS {
        let value = Value::Int(rng.i64(0..=MAX_SAFE));
        let encoded = bufpack::encode_value(varuint.as_ref(), &value).expect("encode");
        assert!(matches!(encoded.len(), 1 | 3 | 5 | 9));
        assert_eq!(
            bufpack::decode_value(varuint.as_ref(), &encoded).expect("decode"),
            value
        );
    }
}
