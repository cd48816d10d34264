/*!
A CLI for producing and checking shape-directed CBOR

# Commands

- `compose`: Convert JSON into CBOR binary
- `inspect`: Decode CBOR against a destination shape and display the result

# Examples

```bash
# Encode a JSON document
echo '{"x": 10, "y": 15, "z": 100}' | cbor compose -o point.cbor

# Decode it as a record
cbor inspect --shape '{"record": [["x", "int"], ["y", "int"], ["z", "int"]]}' point.cbor

# Decode as a map, print JSON
cbor inspect --shape '{"map": ["text", "int"]}' --format json point.cbor

# Show the decoder's decisions
cbor -v=trace inspect --shape '{"sequence": "float32"}' floats.cbor
```
*/

use clap::{Parser, Subcommand, ValueEnum};

mod compose;
mod inspect;
mod io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Verbosity {
    /// Designates very low priority, often extremely verbose, information.
    #[value(name = "trace")]
    Trace,

    /// Designates lower priority information.
    #[value(name = "debug")]
    Debug,

    /// Designates useful information.
    #[value(name = "info")]
    Info,

    /// Designates hazardous situations.
    #[value(name = "warn")]
    Warn,

    /// Designates very serious errors.
    #[value(name = "error")]
    Error,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Trace => tracing::Level::TRACE,
            Verbosity::Debug => tracing::Level::DEBUG,
            Verbosity::Info => tracing::Level::INFO,
            Verbosity::Warn => tracing::Level::WARN,
            Verbosity::Error => tracing::Level::ERROR,
        }
    }
}

/// A CLI tool for composing and inspecting shape-directed CBOR
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for composing and inspecting shape-directed CBOR",
    long_about = "Converts JSON documents to CBOR, and decodes CBOR against a caller-supplied \
                  destination shape.\n\n\
                  Shapes are written as JSON: \"int\", {\"sequence\": \"text\"}, \
                  {\"map\": [\"text\", \"int\"]}, {\"record\": [[\"x\", \"int\"]]}, ..."
)]
struct Cli {
    /// Output additional information, default 'info'.
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "info")]
    verbose: Option<Verbosity>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode CBOR data against a shape and display it
    Inspect(inspect::Command),

    /// Convert JSON to CBOR binary
    Compose(compose::Command),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(level) = cli.verbose.map(tracing::Level::from) {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(level > tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {e}"))?;
    }

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
