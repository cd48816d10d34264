#![no_main]

use libfuzzer_sys::fuzz_target;
use shaped_cbor::{decode, encode, shape::Shape};

fuzz_target!(|data: &[u8]| {
    let Some((selector, data)) = data.split_first() else {
        return;
    };
    let shape = match selector % 4 {
        0 => Shape::sequence(Shape::optional(Shape::Int)),
        1 => Shape::map(Shape::Text, Shape::Bytes),
        2 => Shape::map(Shape::Int, Shape::sequence(Shape::Float32)),
        _ => Shape::sequence(Shape::Float64),
    };

    let Ok(value) = decode::decode(data, &shape) else {
        return;
    };
    let Ok(first) = encode::encode(&value) else {
        return;
    };

    // Whatever decodes must re-encode to a fixed point
    let again = decode::decode(&first, &shape).expect("Re-encoded data does not decode");
    assert_eq!(encode::encode(&again).ok(), Some(first));
});
