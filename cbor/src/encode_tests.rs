use super::encode::*;
use super::value::{Bytes, Field, Record, ToValue, Value};
use alloc::{collections::BTreeMap, string::String, vec, vec::Vec};
use hex_literal::hex;

fn int(n: i128) -> Vec<u8> {
    encode(&Value::Int(n)).unwrap()
}

fn text(s: &str) -> Value {
    Value::Text(s.into())
}

#[test]
fn rfc_tests() {
    // RFC 8949, Appendix A, where the encodings agree:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(int(0), hex!("00"));
    assert_eq!(int(1), hex!("01"));
    assert_eq!(int(10), hex!("0a"));
    assert_eq!(int(24), hex!("1818"));
    assert_eq!(int(25), hex!("1819"));
    assert_eq!(int(100), hex!("1864"));
    assert_eq!(int(1000), hex!("1903e8"));
    assert_eq!(int(1000000), hex!("1a000f4240"));
    assert_eq!(int(1000000000000), hex!("1b000000e8d4a51000"));
    assert_eq!(int(18446744073709551615), hex!("1bffffffffffffffff"));
    assert_eq!(int(-18446744073709551616), hex!("3bffffffffffffffff"));
    assert_eq!(int(-1), hex!("20"));
    assert_eq!(int(-10), hex!("29"));
    assert_eq!(int(-100), hex!("3863"));
    assert_eq!(int(-1000), hex!("3903e7"));

    assert_eq!(encode(&Value::Float64(1.1)).unwrap(), hex!("fb3ff199999999999a"));
    assert_eq!(encode(&Value::Float32(100000.0)).unwrap(), hex!("fa47c35000"));
    assert_eq!(encode(&Value::Float32(f32::MAX)).unwrap(), hex!("fa7f7fffff"));
    assert_eq!(encode(&Value::Float64(1.0e+300)).unwrap(), hex!("fb7e37e43c8800759c"));
    assert_eq!(encode(&Value::Float64(-4.1)).unwrap(), hex!("fbc010666666666666"));
    assert_eq!(encode(&Value::Float32(f32::INFINITY)).unwrap(), hex!("fa7f800000"));
    assert_eq!(encode(&Value::Float32(f32::NEG_INFINITY)).unwrap(), hex!("faff800000"));
    assert_eq!(encode(&Value::Float64(f64::INFINITY)).unwrap(), hex!("fb7ff0000000000000"));
    assert_eq!(encode(&Value::Float64(f64::NAN)).unwrap(), hex!("fb7ff8000000000000"));

    assert_eq!(encode(&Value::Bool(false)).unwrap(), hex!("f4"));
    assert_eq!(encode(&Value::Bool(true)).unwrap(), hex!("f5"));
    assert_eq!(encode(&Value::Null).unwrap(), hex!("f6"));

    assert_eq!(encode(&Value::Bytes(vec![])).unwrap(), hex!("40"));
    assert_eq!(encode(&Value::Bytes(hex!("01020304").to_vec())).unwrap(), hex!("4401020304"));
    assert_eq!(encode(&text("")).unwrap(), hex!("60"));
    assert_eq!(encode(&text("a")).unwrap(), hex!("6161"));
    assert_eq!(encode(&text("IETF")).unwrap(), hex!("6449455446"));
    assert_eq!(encode(&text("\"\\")).unwrap(), hex!("62225c"));
    assert_eq!(encode(&text("\u{00fc}")).unwrap(), hex!("62c3bc"));
    assert_eq!(encode(&text("\u{6c34}")).unwrap(), hex!("63e6b0b4"));
    assert_eq!(encode(&text("\u{10151}")).unwrap(), hex!("64f0908591"));

    assert_eq!(encode(&Value::Sequence(vec![])).unwrap(), hex!("80"));
    assert_eq!(encode_from(&[1, 2, 3]).unwrap(), hex!("83010203"));
    assert_eq!(
        encode(&Value::Sequence(vec![
            Value::Int(1),
            Value::Sequence(vec![Value::Int(2), Value::Int(3)]),
            Value::Sequence(vec![Value::Int(4), Value::Int(5)]),
        ]))
        .unwrap(),
        hex!("8301820203820405")
    );
    assert_eq!(encode(&Value::Map(vec![])).unwrap(), hex!("a0"));
    assert_eq!(
        encode(&Value::Map(vec![
            (Value::Int(1), Value::Int(2)),
            (Value::Int(3), Value::Int(4)),
        ]))
        .unwrap(),
        hex!("a201020304")
    );
    assert_eq!(
        encode(&Value::Map(vec![
            (text("a"), Value::Int(1)),
            (text("b"), Value::Sequence(vec![Value::Int(2), Value::Int(3)])),
        ]))
        .unwrap(),
        hex!("a26161016162820203")
    );
}

#[test]
fn length_thresholds() {
    // 22 is the largest inline value, 23 already needs a trailer
    assert_eq!(int(22), hex!("16"));
    assert_eq!(int(23), hex!("1817"));
    assert_eq!(int(255), hex!("18ff"));
    assert_eq!(int(256), hex!("190100"));
    assert_eq!(int(65535), hex!("19ffff"));
    assert_eq!(int(65536), hex!("1a00010000"));
    assert_eq!(int(4294967295), hex!("1affffffff"));
    assert_eq!(int(4294967296), hex!("1b0000000100000000"));

    // Counts follow the same rule
    assert_eq!(encode(&Value::Bytes(vec![0; 22])).unwrap()[0], 0x56);
    assert_eq!(encode(&Value::Bytes(vec![0; 23])).unwrap()[..2], hex!("5817"));
    assert_eq!(
        encode(&Value::Sequence(vec![Value::Null; 256])).unwrap()[..3],
        hex!("990100")
    );
    assert_eq!(
        encode(&Value::Sequence((1..=25).map(Value::Int).collect())).unwrap(),
        hex!("98190102030405060708090a0b0c0d0e0f10111213141516181718181819")
    );
}

#[test]
fn negative_integers() {
    let data = int(-1);
    assert_eq!(data[0] >> 5, 1);
    assert_eq!(data[0] & 0x1F, 0);

    assert_eq!(int(-100), hex!("3863"));
    assert_eq!(int(-23), hex!("36"));
    assert_eq!(int(-24), hex!("3817"));
}

#[test]
fn integer_range() {
    assert_eq!(
        encode(&Value::Int(18446744073709551616)),
        Err(Error::IntegerOutOfRange(18446744073709551616))
    );
    assert_eq!(
        encode(&Value::Int(-18446744073709551617)),
        Err(Error::IntegerOutOfRange(-18446744073709551617))
    );
    assert_eq!(
        encode(&Value::Sequence(vec![Value::Int(1), Value::Int(i128::MIN)])),
        Err(Error::IntegerOutOfRange(i128::MIN))
    );
}

#[test]
fn invalid_utf8_becomes_bytes() {
    let value = Value::from_utf8_or_bytes(vec![b'a', 0xff, 0xfe]);
    assert_eq!(value, Value::Bytes(vec![b'a', 0xff, 0xfe]));
    assert_eq!(encode(&value).unwrap(), hex!("4361fffe"));

    let value = Value::from_utf8_or_bytes(b"IETF".to_vec());
    assert_eq!(encode(&value).unwrap(), hex!("6449455446"));
}

#[test]
fn record_encoding() {
    let point = Record::new()
        .with_field("x", Value::Int(10))
        .with_field("y", Value::Int(15))
        .with_field("z", Value::Int(100));
    assert_eq!(
        encode(&Value::Record(point)).unwrap(),
        hex!("a361780a61790f617a1864")
    );

    // Keys are lowercased, declaration order kept
    let record = Record::new()
        .with_field("Name", text("Bob"))
        .with_field("AGE", Value::Int(42));
    assert_eq!(
        encode(&Value::Record(record)).unwrap(),
        hex!("a2646e616d6563426f6263616765182a")
    );
}

#[test]
fn hidden_fields() {
    let mut record = Record::new().with_field("name", text("a"));
    record.push(Field::hidden("secret", text("hunter2")));
    assert_eq!(
        encode(&Value::Record(record)).unwrap(),
        hex!("a1646e616d656161")
    );

    let mut record = Record::new();
    record.push(Field::hidden("secret", text("hunter2")));
    assert_eq!(encode(&Value::Record(record)), Err(Error::NoVisibleFields));
    assert_eq!(
        encode(&Value::Record(Record::new())),
        Err(Error::NoVisibleFields)
    );
}

#[test]
fn blob_fields_are_tagged() {
    let mut record = Record::new();
    record.push(Field::blob("Label", text("HoHoHo")));
    assert_eq!(
        encode(&Value::Record(record)).unwrap(),
        hex!("a1d822656c6162656c66486f486f486f")
    );

    // Only the key is tagged, never the value
    let mut record = Record::new();
    record.push(Field::blob("data", Value::Bytes(vec![1, 2])));
    assert_eq!(
        encode(&Value::Record(record)).unwrap(),
        hex!("a1d8226464617461420102")
    );

    let mut inner = Record::new();
    inner.push(Field::blob("b", Value::Int(1)));
    let mut outer = Record::new();
    outer.push(Field::blob("A", Value::Record(inner)));
    assert_eq!(
        encode(&Value::Record(outer)).unwrap(),
        hex!("a1d8226161a1d822616201")
    );
}

#[test]
fn encoder_reuse() {
    let mut encoder = Encoder::new();
    assert_eq!(encoder.encode(&Value::Int(1)).unwrap(), hex!("01"));
    assert_eq!(encoder.encode(&text("a")).unwrap(), hex!("6161"));

    assert_eq!(
        encoder.encode(&Value::Record(Record::new())),
        Err(Error::NoVisibleFields)
    );
    assert!(encoder.encode_from(&Vec::<u8>::new()).is_ok());
    assert_eq!(encoder.build(), hex!("80"));
}

#[test]
fn adapters() {
    assert_eq!(encode_from(&42u8).unwrap(), hex!("182a"));
    assert_eq!(encode_from(&-5i64).unwrap(), hex!("24"));
    assert_eq!(encode_from(&u64::MAX).unwrap(), hex!("1bffffffffffffffff"));
    assert_eq!(encode_from(&1.5f32).unwrap(), hex!("fa3fc00000"));
    assert_eq!(encode_from(&1.5f64).unwrap(), hex!("fb3ff8000000000000"));
    assert_eq!(encode_from("IETF").unwrap(), hex!("6449455446"));
    assert_eq!(encode_from(&String::from("a")).unwrap(), hex!("6161"));
    assert_eq!(encode_from(&Bytes(hex!("0102"))).unwrap(), hex!("420102"));
    assert_eq!(encode_from(&vec![1u8, 2]).unwrap(), hex!("820102"));
    assert_eq!(encode_from(&None::<i32>).unwrap(), hex!("f6"));
    assert_eq!(encode_from(&Some(true)).unwrap(), hex!("f5"));

    let mut map = BTreeMap::new();
    map.insert("b", 2);
    map.insert("a", 1);
    assert_eq!(encode_from(&map).unwrap(), hex!("a2616101616202"));
}

struct Callback;

impl ToValue for Callback {
    fn to_value(&self) -> Result<Value, Error> {
        Err(Error::Unencodable("function"))
    }
}

#[test]
fn unencodable_kinds() {
    assert_eq!(encode_from(&Callback), Err(Error::Unencodable("function")));
    assert_eq!(
        encode_from(&[Some(Callback)]),
        Err(Error::Unencodable("function"))
    );
}
