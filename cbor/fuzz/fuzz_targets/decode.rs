#![no_main]

use libfuzzer_sys::fuzz_target;
use shaped_cbor::shape::{RecordShape, Shape};

fuzz_target!(|data: &[u8]| {
    let shapes = [
        Shape::Int,
        Shape::Text,
        Shape::optional(Shape::Float64),
        Shape::sequence(Shape::Bytes),
        Shape::map(Shape::Text, Shape::sequence(Shape::Int)),
        Shape::Record(
            RecordShape::new()
                .with_field("x", Shape::Int)
                .with_field("label", Shape::optional(Shape::Text))
                .with_field("values", Shape::sequence(Shape::Float32)),
        ),
    ];
    for shape in &shapes {
        if let Ok((value, len)) = shaped_cbor::decode::decode_detail(data, shape) {
            assert!(len <= data.len());
            _ = format!("{value:?}");
        }
    }
});
