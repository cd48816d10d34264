use crate::header::{self, Major};
use crate::value::{Record, ToValue, Value};
use alloc::vec::Vec;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Record has no visible fields")]
    NoVisibleFields,

    #[error("Integer {0} is outside the encodable range")]
    IntegerOutOfRange(i128),

    #[error("Value of kind {0} has no CBOR representation")]
    Unencodable(&'static str),
}

/// Serializes [`Value`]s into an owned buffer.
///
/// [`Encoder::encode`] starts from an empty buffer on every call, so one
/// encoder can be reused for any number of values, but not shared between
/// concurrent callers.
pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    /// Encode a single value, replacing whatever the buffer held before.  On
    /// failure the buffer is left empty.
    pub fn encode(&mut self, value: &Value) -> Result<&[u8], Error> {
        self.data.clear();
        if let Err(e) = self.emit(value) {
            self.data.clear();
            return Err(e);
        }
        Ok(&self.data)
    }

    pub fn encode_from<T>(&mut self, value: &T) -> Result<&[u8], Error>
    where
        T: ToValue + ?Sized,
    {
        let value = value.to_value()?;
        self.encode(&value)
    }

    fn emit_uint_minor(&mut self, major: Major, val: u64) {
        let info = header::uint_info(val);
        self.data.push(header::write_header(major, info));
        match header::trailer_len(info) {
            0 => {}
            width => header::pack_uint(width, val, &mut self.data),
        }
    }

    fn emit_tag(&mut self, tag: u64) {
        self.emit_uint_minor(Major::Tagged, tag)
    }

    pub fn emit(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => {
                self.emit_simple(header::SIMPLE_NULL);
                Ok(())
            }
            Value::Bool(b) => {
                self.emit_simple(if *b {
                    header::SIMPLE_TRUE
                } else {
                    header::SIMPLE_FALSE
                });
                Ok(())
            }
            Value::Int(n) => self.emit_int(*n),
            Value::Float32(f) => {
                self.emit_simple(header::SIMPLE_FLOAT32);
                self.data.extend(header::pack_f32(*f));
                Ok(())
            }
            Value::Float64(f) => {
                self.emit_simple(header::SIMPLE_FLOAT64);
                self.data.extend(header::pack_f64(*f));
                Ok(())
            }
            Value::Text(s) => {
                self.emit_text(s);
                Ok(())
            }
            Value::Bytes(b) => {
                self.emit_bytes(b);
                Ok(())
            }
            Value::Sequence(items) => self.emit_array(items.len(), |a| {
                for item in items {
                    a.emit(item)?;
                }
                Ok(())
            }),
            Value::Map(entries) => self.emit_map(entries.len(), |m| {
                for (k, v) in entries {
                    m.emit(k)?;
                    m.emit(v)?;
                }
                Ok(())
            }),
            Value::Record(record) => self.emit_record(record),
        }
    }

    fn emit_simple(&mut self, info: u8) {
        self.data
            .push(header::write_header(Major::SimpleOrFloat, info))
    }

    pub fn emit_int(&mut self, val: i128) -> Result<(), Error> {
        if val >= 0 {
            let magnitude = u64::try_from(val).map_err(|_| Error::IntegerOutOfRange(val))?;
            self.emit_uint_minor(Major::UnsignedInteger, magnitude);
        } else {
            let magnitude = u64::try_from(-1 - val).map_err(|_| Error::IntegerOutOfRange(val))?;
            self.emit_uint_minor(Major::NegativeInteger, magnitude);
        }
        Ok(())
    }

    pub fn emit_text(&mut self, s: &str) {
        self.emit_uint_minor(Major::TextString, s.len() as u64);
        self.data.extend_from_slice(s.as_bytes())
    }

    pub fn emit_bytes(&mut self, b: &[u8]) {
        self.emit_uint_minor(Major::ByteString, b.len() as u64);
        self.data.extend_from_slice(b)
    }

    pub fn emit_array<F>(&mut self, count: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Array) -> Result<(), Error>,
    {
        let mut a = Array::new(self, count);
        f(&mut a)?;
        a.end();
        Ok(())
    }

    pub fn emit_map<F>(&mut self, count: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Map) -> Result<(), Error>,
    {
        let mut m = Map::new(self, count);
        f(&mut m)?;
        m.end();
        Ok(())
    }

    fn emit_record(&mut self, record: &Record) -> Result<(), Error> {
        let count = record.visible_fields().count();
        if count == 0 {
            return Err(Error::NoVisibleFields);
        }

        self.emit_map(count, |m| {
            for field in record.fields() {
                if !field.is_visible() {
                    trace!("Skipping hidden field {}", field.name);
                    continue;
                }

                let key = field.name.to_lowercase();
                if field.blob {
                    trace!("Tagging blob field {key} as expected base64");
                    m.emit_blob_key(&key);
                } else {
                    m.emit_text(&key);
                }
                m.emit(&field.value)?;
            }
            Ok(())
        })
    }
}

/// A definite-length array (`D == 1`) or map (`D == 2`) under construction.
/// Adding more or fewer items than announced is a bug in the caller.
pub struct Sequence<'a, const D: usize> {
    encoder: &'a mut Encoder,
    count: usize,
    idx: usize,
}

pub type Array<'a> = Sequence<'a, 1>;
pub type Map<'a> = Sequence<'a, 2>;

impl<'a, const D: usize> Sequence<'a, D> {
    fn new(encoder: &'a mut Encoder, count: usize) -> Self {
        encoder.emit_uint_minor(
            if D == 1 { Major::Sequence } else { Major::Map },
            count as u64,
        );
        Self {
            encoder,
            count: count * D,
            idx: 0,
        }
    }

    fn next_field(&mut self) -> &mut Encoder {
        self.idx += 1;
        if self.idx > self.count {
            panic!("Too many items added to definite length sequence")
        }
        self.encoder
    }

    fn end(self) {
        if self.idx != self.count {
            panic!(
                "Definite length sequence is short of items: {}, expected {}",
                self.idx, self.count
            );
        }
    }

    pub fn emit(&mut self, value: &Value) -> Result<(), Error> {
        self.next_field().emit(value)
    }

    pub fn emit_text(&mut self, s: &str) {
        self.next_field().emit_text(s)
    }

    /// A record key marked for binary-blob transport.
    fn emit_blob_key(&mut self, key: &str) {
        let encoder = self.next_field();
        encoder.emit_tag(header::TAG_EXPECTED_BASE64);
        encoder.emit_text(key)
    }
}

/// Encode a value into a fresh buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>, Error> {
    let mut e = Encoder::new();
    e.emit(value)?;
    Ok(e.build())
}

/// Convert an application value with [`ToValue`] and encode it.
pub fn encode_from<T>(value: &T) -> Result<Vec<u8>, Error>
where
    T: ToValue + ?Sized,
{
    encode(&value.to_value()?)
}
