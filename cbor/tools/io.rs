/*!
Reading and writing files, with `-` standing for stdin/stdout
*/

use anyhow::Context;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        let data = match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read stdin")?;
                buffer
            }
            Input::File(path) => {
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
            }
        };
        debug!("Read {} bytes from {self}", data.len());
        Ok(data)
    }

    pub fn read_to_string(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_all()?).with_context(|| format!("{self} is not UTF-8 text"))
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Input::Stdin)
        } else {
            Ok(Input::File(PathBuf::from(s)))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> anyhow::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()?;
            }
            Output::File(path) => {
                fs::write(path, data)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        debug!("Wrote {} bytes", data.len());
        Ok(())
    }

    /// Write text, adding a trailing newline when the destination is stdout.
    pub fn write_line(&self, text: &str) -> anyhow::Result<()> {
        match self {
            Output::Stdout => self.write_all(format!("{text}\n").as_bytes()),
            Output::File(_) => self.write_all(text.as_bytes()),
        }
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "-" {
            Ok(Output::Stdout)
        } else {
            Ok(Output::File(PathBuf::from(s)))
        }
    }
}
