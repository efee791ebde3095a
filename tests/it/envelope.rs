// Copyright 2024 Branchval Contributors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use branchval::envelope::Address;
use branchval::envelope::Kind;
use branchval::envelope::ValueReader;
use branchval::envelope::ValueWriter;
use branchval::Error;
use branchval::JsonValue;

#[test]
fn test_encode_null() {
    assert_eq!(&JsonValue::Null.to_vec(), b"\x00");
}

#[test]
fn test_encode_boolean() {
    assert_eq!(&JsonValue::Bool(true).to_vec(), b"\x01\x01");
    assert_eq!(&JsonValue::Bool(false).to_vec(), b"\x01\x00");
}

#[test]
fn test_encode_number() {
    assert_eq!(
        &JsonValue::Number(10.0).to_vec(),
        b"\x02\x40\x24\0\0\0\0\0\0"
    );
    assert_eq!(
        &JsonValue::Number(1.0).to_vec(),
        b"\x02\x3F\xF0\0\0\0\0\0\0"
    );
    assert_eq!(
        &JsonValue::Number(-100.0).to_vec(),
        b"\x02\xC0\x59\0\0\0\0\0\0"
    );
}

#[test]
fn test_encode_string() {
    assert_eq!(&JsonValue::from("asd").to_vec(), b"\x03\x03\x61\x73\x64");
    assert_eq!(
        &JsonValue::from("测试").to_vec(),
        b"\x03\x06\xE6\xB5\x8B\xE8\xAF\x95"
    );
}

#[test]
fn test_encode_array() {
    assert_eq!(
        &JsonValue::from(vec![1.0f64]).to_vec(),
        b"\x05\x01\x02\x3F\xF0\0\0\0\0\0\0"
    );
}

#[test]
fn test_encode_object() {
    let value: JsonValue = [("k", "v")].into_iter().collect();
    assert_eq!(&value.to_vec(), b"\x06\x01\x03\x01\x6B\x03\x01\x76");
}

#[test]
fn test_decode_round_trip() {
    let values: Vec<JsonValue> = vec![
        JsonValue::Null,
        JsonValue::Bool(false),
        JsonValue::Number(3.25),
        JsonValue::from("round trip"),
        serde_json::json!([1, "two", [true, null]]).into(),
        serde_json::json!({"a": {"b": [1.5, 2.5]}, "c": null}).into(),
    ];
    for value in values {
        let buf = value.to_vec();
        let decoded = JsonValue::from_slice(&buf).unwrap();
        assert_eq!(decoded, value);
    }
}

#[test]
fn test_count_varint_round_trip() {
    for count in [0u64, 1, 127, 128, 300, 16383, 16384, u64::MAX - 1, u64::MAX] {
        let mut w = ValueWriter::new();
        w.write_count(count);
        let buf = w.into_bytes();
        let mut r = ValueReader::new(&buf);
        assert_eq!(r.read_count().unwrap(), count);
        assert!(r.is_empty());
    }
}

#[test]
fn test_count_varint_layout() {
    let mut w = ValueWriter::new();
    w.write_count(300);
    assert_eq!(&w.into_bytes(), b"\xAC\x02");

    let mut w = ValueWriter::new();
    w.write_count(u64::MAX);
    assert_eq!(
        &w.into_bytes(),
        b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF\x01"
    );
}

#[test]
fn test_count_truncated() {
    let mut r = ValueReader::new(b"\x80");
    assert!(matches!(r.read_count(), Err(Error::BadEnvelope(_))));
}

#[test]
fn test_count_overflow() {
    let buf = [0xFFu8; 10];
    let mut r = ValueReader::new(&buf);
    assert!(matches!(r.read_count(), Err(Error::CorruptCount)));
}

#[test]
fn test_peek_does_not_advance() {
    let buf = JsonValue::Bool(true).to_vec();
    let mut r = ValueReader::new(&buf);
    assert_eq!(r.peek_kind().unwrap(), Kind::Bool);
    assert_eq!(r.peek_kind().unwrap(), Kind::Bool);
    assert_eq!(r.pos(), 0);
    assert_eq!(r.read_kind().unwrap(), Kind::Bool);
    assert!(r.read_bool().unwrap());
}

#[test]
fn test_unknown_kind_tag() {
    let mut r = ValueReader::new(b"\x63");
    assert!(matches!(r.peek_kind(), Err(Error::BadEnvelope(_))));
    assert!(matches!(r.skip_value(), Err(Error::BadEnvelope(_))));
}

#[test]
fn test_invalid_bool_payload() {
    let mut r = ValueReader::new(b"\x01\x02");
    r.skip_kind().unwrap();
    assert!(matches!(r.read_bool(), Err(Error::BadEnvelope(_))));
}

#[test]
fn test_invalid_utf8_string() {
    let mut r = ValueReader::new(b"\x03\x02\xFF\xFE");
    r.skip_kind().unwrap();
    assert!(matches!(r.read_string(), Err(Error::BadEnvelope(_))));
}

#[test]
fn test_skip_value_over_stream() {
    let mut w = ValueWriter::new();
    JsonValue::from("first").write_to(&mut w);
    JsonValue::from(serde_json::json!({"nested": [1, 2, {"deep": true}]})).write_to(&mut w);
    w.write_kind(Kind::Blob);
    w.write_bytes(b"\x00\x01\x02");
    JsonValue::Number(7.0).write_to(&mut w);
    let buf = w.into_bytes();

    let mut r = ValueReader::new(&buf);
    r.skip_value().unwrap();
    r.skip_value().unwrap();
    r.skip_value().unwrap();
    assert_eq!(JsonValue::read_from(&mut r).unwrap(), JsonValue::Number(7.0));
    assert!(r.is_empty());
}

#[test]
fn test_skip_truncated_value() {
    // A list claiming three elements but carrying only one.
    let mut w = ValueWriter::new();
    w.write_kind(Kind::List);
    w.write_count(3);
    JsonValue::Null.write_to(&mut w);
    let buf = w.into_bytes();

    let mut r = ValueReader::new(&buf);
    assert!(matches!(r.skip_value(), Err(Error::BadEnvelope(_))));
}

#[test]
fn test_walk_value_reports_refs_in_order() {
    let first = Address::of(b"first value");
    let second = Address::of(b"second value");

    let mut w = ValueWriter::new();
    w.write_kind(Kind::List);
    w.write_count(3);
    w.write_kind(Kind::Ref);
    w.write_address(&first);
    JsonValue::from("interleaved").write_to(&mut w);
    w.write_kind(Kind::Map);
    w.write_count(1);
    JsonValue::from("key").write_to(&mut w);
    w.write_kind(Kind::Ref);
    w.write_address(&second);
    let buf = w.into_bytes();

    let mut r = ValueReader::new(&buf);
    let mut seen = Vec::new();
    r.walk_value(&mut |addr| seen.push(addr)).unwrap();
    assert_eq!(seen, vec![first, second]);
    assert!(r.is_empty());
}

#[test]
fn test_slice_from_spans_one_value() {
    let inner = JsonValue::from(vec![1.0f64, 2.0]);
    let mut w = ValueWriter::new();
    JsonValue::Bool(true).write_to(&mut w);
    inner.write_to(&mut w);
    let buf = w.into_bytes();

    let mut r = ValueReader::new(&buf);
    r.skip_value().unwrap();
    let start = r.pos();
    r.skip_value().unwrap();
    assert_eq!(r.slice_from(start), inner.to_vec().as_slice());
}

#[test]
fn test_json_kind_set() {
    for kind in [Kind::Null, Kind::Bool, Kind::Float, Kind::String, Kind::List, Kind::Map] {
        assert!(kind.is_json());
    }
    for kind in [Kind::Blob, Kind::Ref, Kind::JsonDoc] {
        assert!(!kind.is_json());
    }
}

#[test]
fn test_address_of_is_deterministic() {
    let a = Address::of(b"some value bytes");
    let b = Address::of(b"some value bytes");
    let c = Address::of(b"other value bytes");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string().len(), 40);
}
