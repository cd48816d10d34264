/*!
The value model.

Application data reaches the encoder as a [`Value`], a closed set of kinds that
maps one-to-one onto CBOR items.  Types describe themselves by implementing
[`ToValue`]; plain structs can use [`impl_record!`](crate::impl_record).
*/

use crate::encode::Error;
use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i128),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Record),
}

impl Value {
    /// Classify raw string data: valid UTF-8 becomes [`Value::Text`], anything
    /// else is carried as an opaque [`Value::Bytes`].
    pub fn from_utf8_or_bytes(data: Vec<u8>) -> Self {
        match String::from_utf8(data) {
            Ok(s) => Value::Text(s),
            Err(e) => Value::Bytes(e.into_bytes()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Text(_) => "Text",
            Value::Bytes(_) => "Bytes",
            Value::Sequence(_) => "Sequence",
            Value::Map(_) => "Map",
            Value::Record(_) => "Record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    /// Not part of the external representation, never encoded
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    pub visibility: Visibility,
    /// Annotated for binary-blob transport: the encoder writes tag 34 ahead of
    /// the key.
    pub blob: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            visibility: Visibility::Public,
            blob: false,
        }
    }

    pub fn hidden(name: impl Into<String>, value: Value) -> Self {
        Self {
            visibility: Visibility::Hidden,
            ..Self::new(name, value)
        }
    }

    pub fn blob(name: impl Into<String>, value: Value) -> Self {
        Self {
            blob: true,
            ..Self::new(name, value)
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A named-field aggregate, fields kept in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_visible())
    }

    /// Look a field up by name, ignoring case.  The first declared match wins.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| names_match(&f.name, name))
            .map(|f| &f.value)
    }

    /// Move a field's value out, leaving `Null` behind.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.fields
            .iter_mut()
            .find(|f| names_match(&f.name, name))
            .map(|f| core::mem::take(&mut f.value))
    }
}

impl FromIterator<Field> for Record {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Conversion of an application value into the [`Value`] model.
pub trait ToValue {
    fn to_value(&self) -> Result<Value, Error>;
}

impl ToValue for Value {
    fn to_value(&self) -> Result<Value, Error> {
        Ok(self.clone())
    }
}

impl<T> ToValue for &T
where
    T: ToValue + ?Sized,
{
    fn to_value(&self) -> Result<Value, Error> {
        (**self).to_value()
    }
}

impl<T> ToValue for Box<T>
where
    T: ToValue + ?Sized,
{
    fn to_value(&self) -> Result<Value, Error> {
        self.as_ref().to_value()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! impl_int_to_value {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Result<Value, Error> {
                    num_traits::ToPrimitive::to_i128(self)
                        .map(Value::Int)
                        .ok_or(Error::Unencodable(stringify!($ty)))
                }
            }
        )*
    };
}

impl_int_to_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, i128);

impl ToValue for f32 {
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Float32(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Float64(*self))
    }
}

impl ToValue for str {
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Text(self.into()))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Result<Value, Error> {
        self.as_str().to_value()
    }
}

/// Wrapper marking data as an opaque byte string rather than a sequence of
/// small integers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bytes<T = Vec<u8>>(pub T);

impl<T> ToValue for Bytes<T>
where
    T: AsRef<[u8]>,
{
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Bytes(self.0.as_ref().to_vec()))
    }
}

impl<T> ToValue for [T]
where
    T: ToValue,
{
    fn to_value(&self) -> Result<Value, Error> {
        self.iter()
            .map(ToValue::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence)
    }
}

impl<T, const N: usize> ToValue for [T; N]
where
    T: ToValue,
{
    fn to_value(&self) -> Result<Value, Error> {
        self.as_slice().to_value()
    }
}

impl<T> ToValue for Vec<T>
where
    T: ToValue,
{
    fn to_value(&self) -> Result<Value, Error> {
        self.as_slice().to_value()
    }
}

impl<T> ToValue for Option<T>
where
    T: ToValue,
{
    fn to_value(&self) -> Result<Value, Error> {
        match self {
            Some(value) => value.to_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<K, V> ToValue for BTreeMap<K, V>
where
    K: ToValue,
    V: ToValue,
{
    fn to_value(&self) -> Result<Value, Error> {
        self.iter()
            .map(|(k, v)| Ok::<_, Error>((k.to_value()?, v.to_value()?)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Map)
    }
}

/// Implement [`ToValue`](crate::value::ToValue) and
/// [`FromValue`](crate::shape::FromValue) for a struct with named fields.
///
/// Every listed field is encoded under its name, in the order given.  A field
/// may carry one marker:
///
/// * `#[hidden]` - never encoded and not part of the shape; decoding fills it
///   with `Default::default()`.
/// * `#[blob]` - encoded with a tag 34 ahead of its key.  Tagged items are
///   rejected by the decoder, so such a record does not decode.
///
/// ```
/// use shaped_cbor::{decode, encode, impl_record};
///
/// #[derive(Debug, PartialEq)]
/// struct Range {
///     length: i64,
///     align: f32,
/// }
///
/// impl_record!(Range { length: i64, align: f32 });
///
/// let data = encode::encode_from(&Range { length: 3, align: 41.5 }).unwrap();
/// let r: Range = decode::decode_as(&data).unwrap();
/// assert_eq!(r, Range { length: 3, align: 41.5 });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($name:ident { $( $(#[$marker:ident])? $field:ident : $ty:ty ),* $(,)? }) => {
        impl $crate::value::ToValue for $name {
            fn to_value(
                &self,
            ) -> ::core::result::Result<$crate::value::Value, $crate::encode::Error> {
                let mut record = $crate::value::Record::new();
                $(
                    record.push($crate::__record_field!(
                        [$($marker)?] stringify!($field), &self.$field
                    ));
                )*
                ::core::result::Result::Ok($crate::value::Value::Record(record))
            }
        }

        impl $crate::shape::FromValue for $name {
            fn shape() -> $crate::shape::Shape {
                #[allow(unused_mut)]
                let mut shape = $crate::shape::RecordShape::new();
                $(
                    $crate::__record_shape_field!(
                        [$($marker)?] shape, stringify!($field), $ty
                    );
                )*
                $crate::shape::Shape::Record(shape)
            }

            fn from_value(
                value: $crate::value::Value,
            ) -> ::core::result::Result<Self, $crate::decode::Error> {
                // Unused when every field is hidden
                #[allow(unused_mut, unused_variables)]
                let mut record = match value {
                    $crate::value::Value::Record(record) => record,
                    value => {
                        return ::core::result::Result::Err(
                            $crate::decode::Error::ShapeMismatch {
                                expected: "Record",
                                found: value.kind_name(),
                            },
                        )
                    }
                };
                ::core::result::Result::Ok(Self {
                    $(
                        $field: $crate::__record_take!(
                            [$($marker)?] record, stringify!($field), $ty
                        )?,
                    )*
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ([] $name:expr, $value:expr) => {
        $crate::value::Field::new($name, $crate::value::ToValue::to_value($value)?)
    };
    ([blob] $name:expr, $value:expr) => {
        $crate::value::Field::blob($name, $crate::value::ToValue::to_value($value)?)
    };
    ([hidden] $name:expr, $value:expr) => {
        $crate::value::Field::hidden($name, $crate::value::Value::Null)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_shape_field {
    ([hidden] $shape:ident, $name:expr, $ty:ty) => {};
    ([$($marker:ident)?] $shape:ident, $name:expr, $ty:ty) => {
        $shape.push($name, <$ty as $crate::shape::FromValue>::shape())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_take {
    ([hidden] $record:ident, $name:expr, $ty:ty) => {
        ::core::result::Result::<$ty, $crate::decode::Error>::Ok(
            ::core::default::Default::default(),
        )
    };
    ([$($marker:ident)?] $record:ident, $name:expr, $ty:ty) => {
        <$ty as $crate::shape::FromValue>::from_value(match $record.take($name) {
            ::core::option::Option::Some(value) => value,
            ::core::option::Option::None => {
                <$ty as $crate::shape::FromValue>::shape().default_value()
            }
        })
    };
}
