/*!
Destination shapes.

The decoder never guesses what it is reading: the caller supplies a [`Shape`]
and every item on the wire is checked against it.  Which major types a shape
accepts is fixed by a static table.
*/

use crate::decode::Error;
use crate::header::Major;
use crate::value::{Bytes, Field, Record, Value, names_match};
use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Null,
    Bool,
    Int,
    Float32,
    Float64,
    Text,
    Bytes,
    /// `null`, or a value of the inner shape
    Optional(Box<Shape>),
    Sequence(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Record(RecordShape),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    Sequence,
    Map,
    Record,
}

static COMPATIBILITY: [(ShapeKind, &[Major]); 9] = [
    (ShapeKind::Null, &[Major::SimpleOrFloat]),
    (ShapeKind::Bool, &[Major::SimpleOrFloat]),
    (
        ShapeKind::Int,
        &[Major::UnsignedInteger, Major::NegativeInteger],
    ),
    (ShapeKind::Float, &[Major::SimpleOrFloat]),
    (ShapeKind::Text, &[Major::ByteString, Major::TextString]),
    (ShapeKind::Bytes, &[Major::ByteString, Major::TextString]),
    (ShapeKind::Sequence, &[Major::Sequence]),
    (ShapeKind::Map, &[Major::Map]),
    (ShapeKind::Record, &[Major::Map]),
];

/// The major types a destination of the given kind accepts.
pub fn compatible_majors(kind: ShapeKind) -> &'static [Major] {
    for (k, majors) in COMPATIBILITY.iter() {
        if *k == kind {
            return *majors;
        }
    }
    &[]
}

impl Shape {
    pub fn sequence(element: Shape) -> Self {
        Shape::Sequence(Box::new(element))
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::Map(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    /// The kind used for compatibility checks.  `Optional` reports its inner
    /// kind, `null` is handled ahead of the check.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Null => ShapeKind::Null,
            Shape::Bool => ShapeKind::Bool,
            Shape::Int => ShapeKind::Int,
            Shape::Float32 | Shape::Float64 => ShapeKind::Float,
            Shape::Text => ShapeKind::Text,
            Shape::Bytes => ShapeKind::Bytes,
            Shape::Optional(inner) => inner.kind(),
            Shape::Sequence(_) => ShapeKind::Sequence,
            Shape::Map(..) => ShapeKind::Map,
            Shape::Record(_) => ShapeKind::Record,
        }
    }

    pub fn accepts(&self, major: Major) -> bool {
        compatible_majors(self.kind()).contains(&major)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Null => "Null",
            Shape::Bool => "Boolean",
            Shape::Int => "Integer",
            Shape::Float32 => "Float32",
            Shape::Float64 => "Float64",
            Shape::Text => "Text",
            Shape::Bytes => "Bytes",
            Shape::Optional(_) => "Optional",
            Shape::Sequence(_) => "Sequence",
            Shape::Map(..) => "Map",
            Shape::Record(_) => "Record",
        }
    }

    /// The shape a value would naturally decode back into.  Sequences and
    /// maps take their element shapes from their first entry.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Bool,
            Value::Int(_) => Shape::Int,
            Value::Float32(_) => Shape::Float32,
            Value::Float64(_) => Shape::Float64,
            Value::Text(_) => Shape::Text,
            Value::Bytes(_) => Shape::Bytes,
            Value::Sequence(items) => {
                Shape::sequence(items.first().map_or(Shape::Null, Shape::of))
            }
            Value::Map(entries) => match entries.first() {
                Some((k, v)) => Shape::map(Shape::of(k), Shape::of(v)),
                None => Shape::map(Shape::Null, Shape::Null),
            },
            Value::Record(record) => Shape::Record(
                record
                    .visible_fields()
                    .map(|f| (f.name.clone(), Shape::of(&f.value)))
                    .collect(),
            ),
        }
    }

    /// The zero value of the shape, used for record fields absent on the wire.
    pub fn default_value(&self) -> Value {
        match self {
            Shape::Null | Shape::Optional(_) => Value::Null,
            Shape::Bool => Value::Bool(false),
            Shape::Int => Value::Int(0),
            Shape::Float32 => Value::Float32(0.0),
            Shape::Float64 => Value::Float64(0.0),
            Shape::Text => Value::Text(String::new()),
            Shape::Bytes => Value::Bytes(Vec::new()),
            Shape::Sequence(_) => Value::Sequence(Vec::new()),
            Shape::Map(..) => Value::Map(Vec::new()),
            Shape::Record(shape) => Value::Record(shape.default_record()),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordShape {
    fields: Vec<(String, Shape)>,
}

impl RecordShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.push(name, shape);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, shape: Shape) {
        self.fields.push((name.into(), shape))
    }

    pub fn fields(&self) -> &[(String, Shape)] {
        &self.fields
    }

    /// Index of the first field whose name matches, ignoring case.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| names_match(n, name))
    }

    pub fn default_record(&self) -> Record {
        self.fields
            .iter()
            .map(|(name, shape)| Field::new(name.clone(), shape.default_value()))
            .collect()
    }
}

impl FromIterator<(String, Shape)> for RecordShape {
    fn from_iter<I: IntoIterator<Item = (String, Shape)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Conversion from a decoded [`Value`] into an application type, along with
/// the shape to decode it with.
pub trait FromValue: Sized {
    fn shape() -> Shape;

    fn from_value(value: Value) -> Result<Self, Error>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T, Error> {
    Err(Error::ShapeMismatch {
        expected,
        found: value.kind_name(),
    })
}

impl FromValue for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(b),
            value => mismatch("Boolean", &value),
        }
    }
}

macro_rules! impl_int_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn shape() -> Shape {
                    Shape::Int
                }

                fn from_value(value: Value) -> Result<Self, Error> {
                    match value {
                        Value::Int(n) => <$ty as num_traits::FromPrimitive>::from_i128(n)
                            .ok_or(Error::IntegerOutOfRange(n)),
                        value => mismatch("Integer", &value),
                    }
                }
            }
        )*
    };
}

impl_int_from_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl FromValue for i128 {
    fn shape() -> Shape {
        Shape::Int
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Int(n) => Ok(n),
            value => mismatch("Integer", &value),
        }
    }
}

impl FromValue for f32 {
    fn shape() -> Shape {
        Shape::Float32
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Float32(f) => Ok(f),
            Value::Float64(f) => Ok(f as f32),
            value => mismatch("Float32", &value),
        }
    }
}

impl FromValue for f64 {
    fn shape() -> Shape {
        Shape::Float64
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Float64(f) => Ok(f),
            Value::Float32(f) => Ok(f.into()),
            value => mismatch("Float64", &value),
        }
    }
}

impl FromValue for String {
    fn shape() -> Shape {
        Shape::Text
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Text(s) => Ok(s),
            value => mismatch("Text", &value),
        }
    }
}

impl FromValue for Bytes {
    fn shape() -> Shape {
        Shape::Bytes
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bytes(b) => Ok(Bytes(b)),
            Value::Text(s) => Ok(Bytes(s.into_bytes())),
            value => mismatch("Bytes", &value),
        }
    }
}

impl<T> FromValue for Option<T>
where
    T: FromValue,
{
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T> FromValue for Vec<T>
where
    T: FromValue,
{
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            value => mismatch("Sequence", &value),
        }
    }
}

impl<K, V> FromValue for BTreeMap<K, V>
where
    K: FromValue + Ord,
    V: FromValue,
{
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok::<_, Error>((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            value => mismatch("Map", &value),
        }
    }
}
