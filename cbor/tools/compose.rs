/*!
Compose command - convert JSON to CBOR
*/

use crate::io::{Input, Output};
use clap::Parser;
use shaped_cbor::{encode, value::Value};
use tracing::debug;

/// Convert JSON to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to CBOR binary",
    long_about = "Parse a JSON document and encode it as CBOR.\n\n\
                  Integers become CBOR integers, every other number a 64-bit float.  \
                  Objects become maps with text keys."
)]
pub struct Command {
    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let json: serde_json::Value = serde_json::from_str(&self.input.read_to_string()?)?;
        let value = json_to_value(json);

        let data = encode::encode(&value)?;
        debug!("Encoded {} as {} bytes", value.kind_name(), data.len());

        self.output.unwrap_or_default().write_all(&data)
    }
}

/// Convert a JSON value to the value model
fn json_to_value(value: serde_json::Value) -> Value {
    use serde_json::Value as J;

    match value {
        J::Null => Value::Null,
        J::Bool(b) => Value::Bool(b),
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Int(u.into())
            } else {
                Value::Float64(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        J::String(s) => Value::Text(s),
        J::Array(items) => Value::Sequence(items.into_iter().map(json_to_value).collect()),
        J::Object(obj) => Value::Map(
            obj.into_iter()
                .map(|(k, v)| (Value::Text(k), json_to_value(v)))
                .collect(),
        ),
    }
}
