/*!
Inspect command - decode CBOR against a shape and display the result
*/

use super::io::{Input, Output};
use base64::prelude::*;
use clap::Parser;
use serde::Deserialize;
use shaped_cbor::{
    decode,
    shape::{RecordShape, Shape},
    value::Value,
};
use tracing::{debug, warn};

/// Decode and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Decode CBOR data against a shape and display it", long_about = None)]
pub struct Command {
    /// Destination shape, as JSON
    #[arg(
        short,
        long,
        value_name = "SHAPE",
        value_parser = parse_shape,
        help = "Destination shape as JSON, e.g. \"int\" or {\"sequence\": \"text\"}"
    )]
    shape: Shape,

    /// Output format
    #[arg(
        long,
        default_value = "debug",
        value_name = "FORMAT",
        help = "Output format: debug (value model), json (lossy), hex (the decoded item)"
    )]
    format: OutputFormat,

    /// Reject input with bytes left over after the first item
    #[arg(long)]
    strict: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// The decoded value model, pretty-printed
    Debug,
    /// JSON format (lossy - bytes become base64, record visibility is lost)
    Json,
    /// Hexadecimal dump of the bytes the item occupied
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;

        let (value, len) = decode::decode_detail(&data, &self.shape)?;
        if len < data.len() {
            if self.strict {
                anyhow::bail!("{} trailing bytes after the decoded item", data.len() - len);
            }
            warn!("Ignoring {} trailing bytes", data.len() - len);
        }
        debug!("Decoded {} from {len} bytes", value.kind_name());

        let text = match self.format {
            OutputFormat::Debug => format!("{value:#?}"),
            OutputFormat::Json => serde_json::to_string_pretty(&value_to_json(&value))?,
            OutputFormat::Hex => hex::encode(&data[..len]),
        };
        self.output.unwrap_or_default().write_line(&text)
    }
}

/// The JSON spelling of a [`Shape`]: simple shapes by name, composite shapes
/// as a single-key object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ShapeSpec {
    Null,
    Bool,
    Int,
    Float32,
    Float64,
    Text,
    Bytes,
    Optional(Box<ShapeSpec>),
    Sequence(Box<ShapeSpec>),
    Map(Box<ShapeSpec>, Box<ShapeSpec>),
    Record(Vec<(String, ShapeSpec)>),
}

impl From<ShapeSpec> for Shape {
    fn from(spec: ShapeSpec) -> Self {
        match spec {
            ShapeSpec::Null => Shape::Null,
            ShapeSpec::Bool => Shape::Bool,
            ShapeSpec::Int => Shape::Int,
            ShapeSpec::Float32 => Shape::Float32,
            ShapeSpec::Float64 => Shape::Float64,
            ShapeSpec::Text => Shape::Text,
            ShapeSpec::Bytes => Shape::Bytes,
            ShapeSpec::Optional(inner) => Shape::optional((*inner).into()),
            ShapeSpec::Sequence(element) => Shape::sequence((*element).into()),
            ShapeSpec::Map(key, value) => Shape::map((*key).into(), (*value).into()),
            ShapeSpec::Record(fields) => Shape::Record(
                fields
                    .into_iter()
                    .map(|(name, spec)| (name, spec.into()))
                    .collect::<RecordShape>(),
            ),
        }
    }
}

fn parse_shape(s: &str) -> Result<Shape, serde_json::Error> {
    // A bare name is accepted without JSON quotes
    let spec = match serde_json::from_str::<ShapeSpec>(s) {
        Ok(spec) => spec,
        Err(e) => serde_json::from_value(serde_json::Value::String(s.into())).map_err(|_| e)?,
    };
    Ok(spec.into())
}

/// Convert a decoded value to JSON (lossy)
fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as J;

    match value {
        Value::Null => J::Null,
        Value::Bool(b) => J::Bool(*b),
        Value::Int(n) => {
            if let Ok(i) = i64::try_from(*n) {
                i.into()
            } else if let Ok(u) = u64::try_from(*n) {
                u.into()
            } else {
                // Below i64::MIN, no JSON number holds it exactly
                J::String(n.to_string())
            }
        }
        // JSON doesn't support NaN/Infinity, from_f64 gives null for those
        Value::Float32(f) => serde_json::Number::from_f64((*f).into()).map_or(J::Null, J::Number),
        Value::Float64(f) => serde_json::Number::from_f64(*f).map_or(J::Null, J::Number),
        Value::Text(s) => J::String(s.clone()),
        Value::Bytes(b) => J::String(BASE64_URL_SAFE_NO_PAD.encode(b)),
        Value::Sequence(items) => J::Array(items.iter().map(value_to_json).collect()),
        Value::Map(entries) => J::Object(
            entries
                .iter()
                .map(|(k, v)| {
                    // In JSON, all keys must be strings
                    let key = match value_to_json(k) {
                        J::String(s) => s,
                        other => other.to_string(),
                    };
                    (key, value_to_json(v))
                })
                .collect(),
        ),
        Value::Record(record) => J::Object(
            record
                .visible_fields()
                .map(|field| (field.name.clone(), value_to_json(&field.value)))
                .collect(),
        ),
    }
}
