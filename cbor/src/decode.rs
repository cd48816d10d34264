use crate::header::{self, Major};
use crate::shape::{FromValue, RecordShape, Shape};
use crate::value::Value;
use alloc::{string::String, vec::Vec};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Empty input")]
    EmptyInput,

    #[error("Not enough data for encoded value")]
    Truncated,

    #[error("Incorrect type, expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Field {0:?} does not match any field of the record")]
    UnknownField(String),

    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Integer {0} does not fit the destination type")]
    IntegerOutOfRange(i128),
}

struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Decoder<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if len > self.remaining() {
            return Err(Error::Truncated);
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.data[start..self.offset])
    }

    /// Every item occupies at least one byte, so a count larger than the
    /// remaining input can never be satisfied.
    fn check_count(&self, count: u64, items_per_entry: u64) -> Result<usize, Error> {
        match count.checked_mul(items_per_entry) {
            Some(items) if items <= self.remaining() as u64 => Ok(count as usize),
            _ => Err(Error::Truncated),
        }
    }

    fn parse_item(&mut self, shape: &Shape) -> Result<Value, Error> {
        let (major, minor) = header::read_header(self.take(1)?[0]);
        self.parse_item_body(major, minor, shape)
    }

    fn parse_item_body(
        &mut self,
        major: Major,
        minor: u8,
        shape: &Shape,
    ) -> Result<Value, Error> {
        if major == Major::Tagged {
            return Err(Error::Unsupported("tagged values"));
        }

        if let Shape::Optional(inner) = shape {
            if major == Major::SimpleOrFloat && minor == header::SIMPLE_NULL {
                return Ok(Value::Null);
            }
            return self.parse_item_body(major, minor, inner);
        }

        if !shape.accepts(major) {
            return Err(Error::ShapeMismatch {
                expected: shape.name(),
                found: major.name(),
            });
        }
        if minor == header::INFO_INDEFINITE {
            return Err(Error::Unsupported("indefinite-length items"));
        }
        if minor > header::INFO_UINT64 {
            return Err(Error::InvalidMinorValue(minor));
        }

        let trailer = self.take(header::trailer_len(minor))?;
        if major == Major::SimpleOrFloat {
            return parse_simple(minor, trailer, shape);
        }

        let arg = parse_uint_minor(minor, trailer)?;
        match (major, shape) {
            (Major::UnsignedInteger, _) => Ok(Value::Int(arg as i128)),
            (Major::NegativeInteger, _) => Ok(Value::Int(-1 - arg as i128)),
            (Major::ByteString | Major::TextString, Shape::Bytes) => {
                let data = self.parse_data(arg)?;
                Ok(Value::Bytes(data.to_vec()))
            }
            (Major::ByteString | Major::TextString, _) => {
                let data = self.parse_data(arg)?;
                match core::str::from_utf8(data) {
                    Ok(s) => Ok(Value::Text(s.into())),
                    Err(_) => {
                        trace!("String data is not valid UTF-8, decoding as bytes");
                        Ok(Value::Bytes(data.to_vec()))
                    }
                }
            }
            (Major::Sequence, Shape::Sequence(element)) => self.parse_sequence(arg, element),
            (Major::Map, Shape::Map(key, value)) => self.parse_map(arg, key, value),
            (Major::Map, Shape::Record(record)) => self.parse_record(arg, record),
            (major, shape) => Err(Error::ShapeMismatch {
                expected: shape.name(),
                found: major.name(),
            }),
        }
    }

    fn parse_data(&mut self, len: u64) -> Result<&'a [u8], Error> {
        let len = usize::try_from(len).map_err(|_| Error::Truncated)?;
        self.take(len)
    }

    fn parse_sequence(&mut self, count: u64, element: &Shape) -> Result<Value, Error> {
        let count = self.check_count(count, 1)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.parse_item(element)?);
        }
        Ok(Value::Sequence(items))
    }

    fn parse_map(
        &mut self,
        count: u64,
        key_shape: &Shape,
        value_shape: &Shape,
    ) -> Result<Value, Error> {
        let count = self.check_count(count, 2)?;
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.parse_item(key_shape)?;
            let value = self.parse_item(value_shape)?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => {
                    trace!("Duplicate map key {key:?}, keeping the last value");
                    entry.1 = value;
                }
                None => entries.push((key, value)),
            }
        }
        Ok(Value::Map(entries))
    }

    fn parse_record(&mut self, count: u64, shape: &RecordShape) -> Result<Value, Error> {
        let count = self.check_count(count, 2)?;
        let mut record = shape.default_record();
        for _ in 0..count {
            let name = match self.parse_item(&Shape::Text)? {
                Value::Text(name) => name,
                Value::Bytes(b) => {
                    return Err(Error::UnknownField(
                        String::from_utf8_lossy(&b).into_owned(),
                    ));
                }
                value => {
                    return Err(Error::ShapeMismatch {
                        expected: "Text",
                        found: value.kind_name(),
                    });
                }
            };
            let Some(idx) = shape.position(&name) else {
                return Err(Error::UnknownField(name));
            };
            let value = self.parse_item(&shape.fields()[idx].1)?;
            record.fields_mut()[idx].value = value;
        }
        Ok(Value::Record(record))
    }
}

fn parse_uint_minor(minor: u8, trailer: &[u8]) -> Result<u64, Error> {
    if trailer.is_empty() {
        Ok(minor as u64)
    } else {
        header::unpack_uint(trailer).ok_or(Error::Truncated)
    }
}

fn parse_simple(minor: u8, trailer: &[u8], shape: &Shape) -> Result<Value, Error> {
    match minor {
        header::SIMPLE_FALSE | header::SIMPLE_TRUE => match shape {
            Shape::Bool => Ok(Value::Bool(minor == header::SIMPLE_TRUE)),
            _ => Err(Error::ShapeMismatch {
                expected: shape.name(),
                found: "Boolean",
            }),
        },
        header::SIMPLE_NULL => Ok(Value::Null),
        header::SIMPLE_UNDEFINED => Err(Error::Unsupported("undefined")),
        header::SIMPLE_FLOAT16 => Err(Error::Unsupported("half-precision floats")),
        header::SIMPLE_FLOAT32 => {
            let f = header::unpack_f32(trailer).ok_or(Error::Truncated)?;
            match shape {
                Shape::Float32 => Ok(Value::Float32(f)),
                Shape::Float64 => Ok(Value::Float64(f.into())),
                _ => Err(Error::ShapeMismatch {
                    expected: shape.name(),
                    found: "Float32",
                }),
            }
        }
        header::SIMPLE_FLOAT64 => {
            let f = header::unpack_f64(trailer).ok_or(Error::Truncated)?;
            match shape {
                Shape::Float64 => Ok(Value::Float64(f)),
                Shape::Float32 => {
                    // Out of range values saturate to infinity
                    trace!("Narrowing {f} to single precision");
                    Ok(Value::Float32(f as f32))
                }
                _ => Err(Error::ShapeMismatch {
                    expected: shape.name(),
                    found: "Float64",
                }),
            }
        }
        _ => Err(Error::Unsupported("simple values")),
    }
}

/// Decode the first item of `data` into `shape`, returning the value and the
/// number of bytes consumed.
pub fn decode_detail(data: &[u8], shape: &Shape) -> Result<(Value, usize), Error> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut decoder = Decoder { data, offset: 0 };
    let value = decoder.parse_item(shape)?;
    Ok((value, decoder.offset))
}

/// Decode the first item of `data` into `shape`.  Anything after that item is
/// ignored.
pub fn decode(data: &[u8], shape: &Shape) -> Result<Value, Error> {
    decode_detail(data, shape).map(|(value, _)| value)
}

/// Decode with the shape of `T` and convert the result.
pub fn decode_as<T>(data: &[u8]) -> Result<T, Error>
where
    T: FromValue,
{
    T::from_value(decode(data, &T::shape())?)
}
